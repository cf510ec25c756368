//! The fixed catalog of views the dashboard and exporter know about.

use std::fmt::Display;

/// One of the precomputed views in the bank database.
///
/// The SQL name of a view is interpolated into a `SELECT` statement, so a
/// view can only be constructed from this enum, never from arbitrary text.
/// Use [View::from_sql_name] to accept a name from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Churn rate per branch.
    ChurnByBranch,
    /// Churn rate per account type.
    ChurnByAccountType,
    /// Churn rate per income band.
    IncomeBandChurn,
    /// Average balance per branch.
    AvgBalanceByBranch,
    /// Average balance per account type.
    AvgBalanceByAccountType,
    /// Average balance per tenure group.
    BalanceByTenure,
    /// Number of customers per account type.
    AccountTypeDistribution,
    /// Number of customers per branch.
    BranchDistribution,
    /// The customers with the largest balances.
    HighValueCustomers,
    /// A single row of headline metrics.
    OverallKpis,
    /// Churn and balance metrics per branch.
    BranchPerformance,
}

impl View {
    /// Every view in the catalog, in display and export order.
    pub const ALL: [View; 11] = [
        View::ChurnByBranch,
        View::ChurnByAccountType,
        View::IncomeBandChurn,
        View::AvgBalanceByBranch,
        View::AvgBalanceByAccountType,
        View::BalanceByTenure,
        View::AccountTypeDistribution,
        View::BranchDistribution,
        View::HighValueCustomers,
        View::OverallKpis,
        View::BranchPerformance,
    ];

    /// The name of the view in the database schema.
    pub const fn sql_name(self) -> &'static str {
        match self {
            View::ChurnByBranch => "churn_by_branch",
            View::ChurnByAccountType => "churn_by_account_type",
            View::IncomeBandChurn => "income_band_churn",
            View::AvgBalanceByBranch => "avg_balance_by_branch",
            View::AvgBalanceByAccountType => "avg_balance_by_account_type",
            View::BalanceByTenure => "balance_by_tenure",
            View::AccountTypeDistribution => "account_type_distribution",
            View::BranchDistribution => "branch_distribution",
            View::HighValueCustomers => "high_value_customers",
            View::OverallKpis => "overall_kpis",
            View::BranchPerformance => "branch_performance",
        }
    }

    /// The human readable name shown in the view picker.
    pub const fn label(self) -> &'static str {
        match self {
            View::ChurnByBranch => "Churn by Branch",
            View::ChurnByAccountType => "Churn by Account Type",
            View::IncomeBandChurn => "Income Band Churn",
            View::AvgBalanceByBranch => "Average Balance by Branch",
            View::AvgBalanceByAccountType => "Average Balance by Account Type",
            View::BalanceByTenure => "Balance by Tenure",
            View::AccountTypeDistribution => "Account Type Distribution",
            View::BranchDistribution => "Branch Distribution",
            View::HighValueCustomers => "High Value Customers",
            View::OverallKpis => "Overall KPIs",
            View::BranchPerformance => "Branch Performance",
        }
    }

    /// Find the catalog entry whose SQL name is exactly `name`.
    pub fn from_sql_name(name: &str) -> Option<View> {
        View::ALL.into_iter().find(|view| view.sql_name() == name)
    }

    /// The file name the view is exported to, e.g. "overall_kpis.csv".
    pub fn csv_file_name(self) -> String {
        format!("{}.csv", self.sql_name())
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::View;

    #[test]
    fn catalog_has_eleven_distinct_views() {
        let names: HashSet<_> = View::ALL.iter().map(|view| view.sql_name()).collect();
        let labels: HashSet<_> = View::ALL.iter().map(|view| view.label()).collect();

        assert_eq!(names.len(), 11);
        assert_eq!(labels.len(), 11);
    }

    #[test]
    fn from_sql_name_round_trips_every_view() {
        for view in View::ALL {
            assert_eq!(View::from_sql_name(view.sql_name()), Some(view));
        }
    }

    #[test]
    fn from_sql_name_rejects_other_text() {
        assert_eq!(View::from_sql_name("customers"), None);
        assert_eq!(View::from_sql_name("overall_kpis; DROP TABLE customers"), None);
        assert_eq!(View::from_sql_name("OVERALL_KPIS"), None);
        assert_eq!(View::from_sql_name(""), None);
    }

    #[test]
    fn csv_file_name_uses_sql_name() {
        assert_eq!(View::HighValueCustomers.csv_file_name(), "high_value_customers.csv");
    }
}
