//! The report groups and the panels each one shows.
//!
//! A panel is one chart or table built from one view. Panels are built
//! independently, so a view that is empty or failed to load only removes
//! its own panel, and a view missing a column only turns its own panel into
//! an error alert.

use charming::Chart;
use maud::{Markup, html};

use crate::{
    Error,
    alert::Alert,
    dashboard::{
        charts::{
            DashboardChart, account_type_distribution_chart, avg_balance_by_account_type_chart,
            avg_balance_by_branch_chart, balance_by_tenure_chart, branch_distribution_chart,
            branch_performance_chart, churn_by_account_type_chart, churn_by_branch_chart,
            income_band_churn_chart,
        },
        tables::view_table,
    },
    endpoints,
    view::{View, ViewCache, ViewTable},
};

/// The columns of `high_value_customers` shown on the segmentation page.
const HIGH_VALUE_COLUMNS: [&str; 6] = [
    "customer_id",
    "branch",
    "account_type",
    "balance",
    "income",
    "tenure_years",
];

/// What a panel displays.
pub(super) enum PanelContent {
    Chart(DashboardChart),
    Table(Markup),
    /// The view loaded but could not be displayed.
    Error(String),
}

/// One chart or table rendered from one view's rows.
pub(super) struct Panel {
    pub view: View,
    pub title: &'static str,
    /// Whether the panel spans both grid columns on wide screens.
    pub full_width: bool,
    pub content: PanelContent,
}

/// The report groups that show panels, one page each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReportGroup {
    Churn,
    Balance,
    Segmentation,
    BranchPerformance,
}

impl ReportGroup {
    /// The route the group's page is served from.
    pub(super) fn endpoint(self) -> &'static str {
        match self {
            ReportGroup::Churn => endpoints::CHURN_VIEW,
            ReportGroup::Balance => endpoints::BALANCE_VIEW,
            ReportGroup::Segmentation => endpoints::SEGMENTATION_VIEW,
            ReportGroup::BranchPerformance => endpoints::BRANCHES_VIEW,
        }
    }

    /// The page title.
    pub(super) fn title(self) -> &'static str {
        match self {
            ReportGroup::Churn => "Churn Analysis",
            ReportGroup::Balance => "Balance Analysis",
            ReportGroup::Segmentation => "Customer Segmentation",
            ReportGroup::BranchPerformance => "Branch Performance",
        }
    }

    /// The heading shown above the group's panels.
    pub(super) fn heading(self) -> &'static str {
        match self {
            ReportGroup::Churn => "Customer Churn Analysis",
            ReportGroup::Balance => "Balance & Financial Analysis",
            ReportGroup::Segmentation => "Customer Segmentation",
            ReportGroup::BranchPerformance => "Branch Performance Overview",
        }
    }

    /// Build the group's panels from the session cache, in display order.
    pub(super) fn panels(self, cache: &ViewCache) -> Vec<Panel> {
        let panels = match self {
            ReportGroup::Churn => vec![
                chart_panel(
                    &cache.get_or_empty(View::ChurnByBranch),
                    "Churn Rate by Branch",
                    "churn-by-branch-chart",
                    false,
                    churn_by_branch_chart,
                ),
                chart_panel(
                    &cache.get_or_empty(View::ChurnByAccountType),
                    "Churn Rate by Account Type",
                    "churn-by-account-type-chart",
                    false,
                    churn_by_account_type_chart,
                ),
                chart_panel(
                    &cache.get_or_empty(View::IncomeBandChurn),
                    "Churn by Income Band",
                    "income-band-churn-chart",
                    true,
                    income_band_churn_chart,
                ),
            ],
            ReportGroup::Balance => vec![
                chart_panel(
                    &cache.get_or_empty(View::AvgBalanceByBranch),
                    "Average Balance by Branch",
                    "avg-balance-by-branch-chart",
                    false,
                    avg_balance_by_branch_chart,
                ),
                chart_panel(
                    &cache.get_or_empty(View::AvgBalanceByAccountType),
                    "Average Balance by Account Type",
                    "avg-balance-by-account-type-chart",
                    false,
                    avg_balance_by_account_type_chart,
                ),
                chart_panel(
                    &cache.get_or_empty(View::BalanceByTenure),
                    "Balance by Customer Tenure",
                    "balance-by-tenure-chart",
                    true,
                    balance_by_tenure_chart,
                ),
            ],
            ReportGroup::Segmentation => vec![
                chart_panel(
                    &cache.get_or_empty(View::AccountTypeDistribution),
                    "Account Type Distribution",
                    "account-type-distribution-chart",
                    false,
                    account_type_distribution_chart,
                ),
                chart_panel(
                    &cache.get_or_empty(View::BranchDistribution),
                    "Branch Distribution",
                    "branch-distribution-chart",
                    false,
                    branch_distribution_chart,
                ),
                table_panel(
                    &cache.get_or_empty(View::HighValueCustomers),
                    "High-Value Customers",
                    Some(&HIGH_VALUE_COLUMNS),
                ),
            ],
            ReportGroup::BranchPerformance => {
                let table = cache.get_or_empty(View::BranchPerformance);

                vec![
                    chart_panel(
                        &table,
                        "Branch Performance: Churn Rate vs Average Balance",
                        "branch-performance-chart",
                        true,
                        branch_performance_chart,
                    ),
                    table_panel(&table, "Branch Performance Metrics", None),
                ]
            }
        };

        panels.into_iter().flatten().collect()
    }
}

/// A chart panel, or `None` if the view has no rows.
fn chart_panel(
    table: &ViewTable,
    title: &'static str,
    id: &'static str,
    full_width: bool,
    build: fn(&ViewTable) -> Result<Chart, Error>,
) -> Option<Panel> {
    if table.is_empty() {
        tracing::debug!("omitting panel '{title}', {} has no rows", table.view());
        return None;
    }

    let content = match build(table) {
        Ok(chart) => PanelContent::Chart(DashboardChart::new(id, chart)),
        Err(error) => panel_error(title, error),
    };

    Some(Panel {
        view: table.view(),
        title,
        full_width,
        content,
    })
}

/// A full width table panel, or `None` if the view has no rows.
///
/// Only `columns` are shown if given, otherwise every column.
fn table_panel(
    table: &ViewTable,
    title: &'static str,
    columns: Option<&[&str]>,
) -> Option<Panel> {
    if table.is_empty() {
        tracing::debug!("omitting panel '{title}', {} has no rows", table.view());
        return None;
    }

    let content = match columns {
        Some(columns) => match table.project(columns) {
            Ok(projected) => PanelContent::Table(view_table(&projected)),
            Err(error) => panel_error(title, error),
        },
        None => PanelContent::Table(view_table(table)),
    };

    Some(Panel {
        view: table.view(),
        title,
        full_width: true,
        content,
    })
}

fn panel_error(title: &str, error: Error) -> PanelContent {
    tracing::error!("could not display panel '{title}': {error}");

    PanelContent::Error(format!("Could not display this panel: {error}"))
}

/// The charts among `panels`, for the initialization script.
pub(super) fn panel_charts(panels: &[Panel]) -> Vec<&DashboardChart> {
    panels
        .iter()
        .filter_map(|panel| match &panel.content {
            PanelContent::Chart(chart) => Some(chart),
            _ => None,
        })
        .collect()
}

/// Renders the panels in a two column grid.
pub(super) fn panels_view(panels: &[Panel]) -> Markup {
    html! {
        div id="panels" class="grid grid-cols-1 xl:grid-cols-2 gap-6"
        {
            @for panel in panels {
                @let style = if panel.full_width {
                    "flex flex-col gap-2 xl:col-span-2"
                } else {
                    "flex flex-col gap-2"
                };

                section
                    class=(style)
                    data-panel=(panel.view.sql_name())
                {
                    h3 class="text-lg font-semibold" { (panel.title) }

                    @match &panel.content {
                        PanelContent::Chart(chart) => {
                            div
                                id=(chart.id)
                                class="min-h-[400px] rounded dark:bg-gray-100"
                            {}
                        }
                        PanelContent::Table(table) => { (table) }
                        PanelContent::Error(message) => { (Alert::error(message).into_html()) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;
    use scraper::Html;

    use crate::{
        View, ViewCache, ViewTable,
        dashboard::charts::churn_by_branch_chart,
        test_utils::{TestDatabase, assert_element_exists, drop_view, select_text},
    };

    use super::{
        HIGH_VALUE_COLUMNS, PanelContent, ReportGroup, chart_panel, panel_charts, panels_view,
        table_panel,
    };

    fn panel_views(group: ReportGroup, cache: &ViewCache) -> Vec<View> {
        group.panels(cache).iter().map(|panel| panel.view).collect()
    }

    #[test]
    fn each_group_has_its_panels() {
        let db = TestDatabase::sample();
        let cache = ViewCache::new(db.path());

        assert_eq!(
            panel_views(ReportGroup::Churn, &cache),
            vec![
                View::ChurnByBranch,
                View::ChurnByAccountType,
                View::IncomeBandChurn
            ]
        );
        assert_eq!(
            panel_views(ReportGroup::Balance, &cache),
            vec![
                View::AvgBalanceByBranch,
                View::AvgBalanceByAccountType,
                View::BalanceByTenure
            ]
        );
        assert_eq!(
            panel_views(ReportGroup::Segmentation, &cache),
            vec![
                View::AccountTypeDistribution,
                View::BranchDistribution,
                View::HighValueCustomers
            ]
        );
        assert_eq!(
            panel_views(ReportGroup::BranchPerformance, &cache),
            vec![View::BranchPerformance, View::BranchPerformance]
        );
    }

    #[test]
    fn missing_view_drops_only_its_panel() {
        let db = TestDatabase::sample();
        drop_view(&db, View::ChurnByAccountType);
        let cache = ViewCache::new(db.path());

        assert_eq!(
            panel_views(ReportGroup::Churn, &cache),
            vec![View::ChurnByBranch, View::IncomeBandChurn]
        );
    }

    #[test]
    fn empty_view_has_no_panel() {
        let table = ViewTable::empty(View::ChurnByBranch);

        let panel = chart_panel(&table, "Churn", "churn", false, churn_by_branch_chart);

        assert!(panel.is_none());
    }

    #[test]
    fn missing_column_becomes_panel_error() {
        let table = ViewTable::new(
            View::ChurnByBranch,
            vec!["branch".to_owned()],
            vec![vec![Value::Text("Uptown".to_owned())]],
        );

        let panel = chart_panel(&table, "Churn", "churn", false, churn_by_branch_chart).unwrap();
        let html = Html::parse_fragment(&panels_view(&[panel]).into_string());

        let alerts = select_text(&html, "[data-panel='churn_by_branch'] [role='alert']");
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("churn_rate_pct"), "{alerts:?}");
    }

    #[test]
    fn high_value_table_is_projected() {
        let db = TestDatabase::sample();
        let cache = ViewCache::new(db.path());
        let table = cache.get(View::HighValueCustomers).unwrap();

        let panel =
            table_panel(&table, "High-Value Customers", Some(&HIGH_VALUE_COLUMNS)).unwrap();
        let html = Html::parse_fragment(&panels_view(&[panel]).into_string());

        assert_eq!(select_text(&html, "th"), HIGH_VALUE_COLUMNS.to_vec());
    }

    #[test]
    fn chart_panels_get_containers() {
        let db = TestDatabase::sample();
        let cache = ViewCache::new(db.path());
        let panels = ReportGroup::BranchPerformance.panels(&cache);

        let charts = panel_charts(&panels);
        let html = Html::parse_fragment(&panels_view(&panels).into_string());

        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].id, "branch-performance-chart");
        assert_element_exists(&html, "#branch-performance-chart");
        assert_element_exists(&html, "[data-panel='branch_performance'] table");
        assert!(matches!(panels[1].content, PanelContent::Table(_)));
    }
}
