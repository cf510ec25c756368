//! Dashboard module
//!
//! Serves one page per report group. Every page shows the KPI strip and the
//! group's panels, each built from one cached view.

mod cards;
mod charts;
mod handlers;
mod kpi;
mod panels;
mod tables;

pub use handlers::{
    clear_cache, get_balance_page, get_branches_page, get_churn_page,
    get_data_tables_page, get_segmentation_page, get_view_csv,
};
