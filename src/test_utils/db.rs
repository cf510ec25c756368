use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

use crate::{View, create_sample_database};

/// A SQLite database file in a temporary directory that is deleted on drop.
pub(crate) struct TestDatabase {
    _dir: TempDir,
    path: PathBuf,
}

impl TestDatabase {
    /// A database file with no tables or views.
    pub(crate) fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Could not create temporary directory");
        let path = dir.path().join("bank.db");
        Connection::open(&path).expect("Could not create test database");

        Self { _dir: dir, path }
    }

    /// A database with the sample customers and all eleven views.
    pub(crate) fn sample() -> Self {
        let db = Self::empty();
        create_sample_database(&db.connection()).expect("Could not create sample database");

        db
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// A read-write connection for setting up test data.
    pub(crate) fn connection(&self) -> Connection {
        Connection::open(&self.path).expect("Could not open test database")
    }
}

#[track_caller]
pub(crate) fn drop_view(db: &TestDatabase, view: View) {
    db.connection()
        .execute_batch(&format!("DROP VIEW {};", view.sql_name()))
        .expect("Could not drop view");
}

/// Create an `overall_kpis` view that returns a single row of literals.
#[track_caller]
pub(crate) fn create_overall_kpis_view(
    connection: &Connection,
    total_customers: i64,
    churn_rate_pct: f64,
    avg_balance: f64,
    total_balance: f64,
) {
    // `{:?}` keeps the ".0" on whole floats so SQLite stores them as REAL.
    connection
        .execute_batch(&format!(
            "CREATE VIEW overall_kpis AS SELECT
                {total_customers} AS total_customers,
                {churn_rate_pct:?} AS overall_churn_rate_pct,
                {avg_balance:?} AS avg_balance,
                {total_balance:?} AS total_balance;"
        ))
        .expect("Could not create overall_kpis view");
}
