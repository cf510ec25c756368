//! Memoizes view reads for the lifetime of one dashboard session.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    Error,
    view::{View, ViewTable, load_view},
};

/// The tables read so far in a dashboard session, keyed by view.
///
/// Several panels may show the same view, and a page is re-rendered every
/// time the user interacts with it, so each view is queried at most once
/// per session. Only successful reads are kept: a view that failed to load
/// is queried again on the next request.
#[derive(Debug)]
pub struct ViewCache {
    db_path: PathBuf,
    tables: Mutex<HashMap<View, Arc<ViewTable>>>,
}

impl ViewCache {
    /// Create an empty cache for the database at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// The database the cache reads from.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Get the table for `view`, querying the database on a cache miss.
    ///
    /// The lock is held while querying so concurrent requests for the
    /// same view share one query.
    ///
    /// # Errors
    /// Returns [Error::CacheLockError] if the lock is poisoned, otherwise
    /// the error from [load_view].
    pub fn get(&self, view: View) -> Result<Arc<ViewTable>, Error> {
        let mut tables = self
            .tables
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire view cache lock: {error}"))
            .map_err(|_| Error::CacheLockError)?;

        if let Some(table) = tables.get(&view) {
            tracing::debug!("view cache hit for {view}");
            return Ok(table.clone());
        }

        tracing::debug!("view cache miss for {view}, querying {:?}", self.db_path);
        let table = Arc::new(load_view(&self.db_path, view)?);
        tables.insert(view, table.clone());

        Ok(table)
    }

    /// Get the table for `view`, or an empty table if it cannot be loaded.
    ///
    /// Panels treat "no data" and "could not load" the same way, so the
    /// error is only logged.
    pub fn get_or_empty(&self, view: View) -> Arc<ViewTable> {
        self.get(view).unwrap_or_else(|error| {
            tracing::error!("Error loading {view}: {error}");
            Arc::new(ViewTable::empty(view))
        })
    }

    /// Forget every cached table, ending the session.
    pub fn clear(&self) {
        match self.tables.lock() {
            Ok(mut tables) => tables.clear(),
            Err(poisoned) => {
                tracing::warn!("view cache lock was poisoned, clearing it anyway");
                let mut tables = poisoned.into_inner();
                tables.clear();
                self.tables.clear_poison();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, View,
        test_utils::{TestDatabase, drop_view},
    };

    use super::ViewCache;

    #[test]
    fn reports_the_database_it_reads() {
        let db = TestDatabase::sample();

        let cache = ViewCache::new(db.path());

        assert_eq!(cache.db_path(), db.path());
    }

    #[test]
    fn second_get_is_served_from_cache() {
        let db = TestDatabase::sample();
        let cache = ViewCache::new(db.path());

        let first = cache.get(View::ChurnByBranch).unwrap();
        // If the cache queried again it would now fail.
        drop_view(&db, View::ChurnByBranch);
        let second = cache.get(View::ChurnByBranch).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn clear_forces_a_new_query() {
        let db = TestDatabase::sample();
        let cache = ViewCache::new(db.path());
        cache.get(View::ChurnByBranch).unwrap();
        drop_view(&db, View::ChurnByBranch);

        cache.clear();

        assert_eq!(
            cache.get(View::ChurnByBranch),
            Err(Error::ViewNotFound(View::ChurnByBranch))
        );
    }

    #[test]
    fn failures_are_not_cached() {
        let db = TestDatabase::empty();
        let cache = ViewCache::new(db.path());
        assert_eq!(
            cache.get(View::OverallKpis),
            Err(Error::ViewNotFound(View::OverallKpis))
        );

        crate::create_sample_database(&db.connection()).unwrap();

        assert!(!cache.get(View::OverallKpis).unwrap().is_empty());
    }

    #[test]
    fn get_or_empty_resolves_failures_to_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ViewCache::new(dir.path().join("missing.db"));

        let table = cache.get_or_empty(View::BranchDistribution);

        assert!(table.is_empty());
        assert_eq!(table.view(), View::BranchDistribution);
    }
}
