//! The headline metrics shown at the top of every dashboard page.

use crate::{
    Error,
    view::{View, ViewCache, ViewTable},
};

/// The scalar metrics read from the `overall_kpis` view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Kpis {
    pub total_customers: i64,
    pub churn_rate_pct: f64,
    pub avg_balance: f64,
    pub total_balance: f64,
}

impl Kpis {
    /// Read the metrics from the first row of `table`.
    ///
    /// Returns `None` if the table has no rows.
    ///
    /// # Errors
    /// Returns [Error::MissingColumn] or [Error::InvalidValue] if a metric
    /// column is absent or not a number.
    pub(super) fn from_table(table: &ViewTable) -> Result<Option<Kpis>, Error> {
        if table.is_empty() {
            return Ok(None);
        }

        let first = |column: &str| -> Result<f64, Error> {
            table.number_column(column).map(|values| values[0])
        };

        Ok(Some(Kpis {
            total_customers: first("total_customers")?.round() as i64,
            churn_rate_pct: first("overall_churn_rate_pct")?,
            avg_balance: first("avg_balance")?,
            total_balance: first("total_balance")?,
        }))
    }
}

/// Fetch the KPIs through the session cache.
///
/// A database without an `overall_kpis` view is treated the same as an
/// empty one and yields `Ok(None)`.
///
/// # Errors
/// Any other load failure, e.g. a missing database file.
pub(super) fn load_kpis(cache: &ViewCache) -> Result<Option<Kpis>, Error> {
    match cache.get(View::OverallKpis) {
        Ok(table) => Kpis::from_table(&table),
        Err(Error::ViewNotFound(_)) => {
            tracing::warn!("the overall_kpis view does not exist");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use crate::{
        Error, View, ViewCache, ViewTable,
        test_utils::{TestDatabase, create_overall_kpis_view},
    };

    use super::{Kpis, load_kpis};

    #[test]
    fn reads_first_row() {
        let db = TestDatabase::empty();
        create_overall_kpis_view(&db.connection(), 12345, 7.25, 1234.5, 9876543.0);
        let cache = ViewCache::new(db.path());

        let kpis = load_kpis(&cache).unwrap();

        assert_eq!(
            kpis,
            Some(Kpis {
                total_customers: 12345,
                churn_rate_pct: 7.25,
                avg_balance: 1234.5,
                total_balance: 9876543.0,
            })
        );
    }

    #[test]
    fn missing_view_is_no_data() {
        let db = TestDatabase::empty();
        let cache = ViewCache::new(db.path());

        assert_eq!(load_kpis(&cache), Ok(None));
    }

    #[test]
    fn empty_view_is_no_data() {
        let table = ViewTable::new(
            View::OverallKpis,
            vec!["total_customers".to_owned()],
            Vec::new(),
        );

        assert_eq!(Kpis::from_table(&table), Ok(None));
    }

    #[test]
    fn missing_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ViewCache::new(dir.path().join("bank.db"));

        assert!(matches!(
            load_kpis(&cache),
            Err(Error::DatabaseNotFound(_))
        ));
    }

    #[test]
    fn missing_column_is_an_error() {
        let table = ViewTable::new(
            View::OverallKpis,
            vec!["total_customers".to_owned()],
            vec![vec![Value::Integer(10)]],
        );

        assert_eq!(
            Kpis::from_table(&table),
            Err(Error::MissingColumn {
                view: View::OverallKpis,
                column: "overall_churn_rate_pct".to_owned(),
            })
        );
    }
}
