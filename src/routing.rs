//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::{
        clear_cache, get_balance_page, get_branches_page, get_churn_page, get_data_tables_page,
        get_segmentation_page, get_view_csv,
    },
    endpoints,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::CHURN_VIEW, get(get_churn_page))
        .route(endpoints::BALANCE_VIEW, get(get_balance_page))
        .route(endpoints::SEGMENTATION_VIEW, get(get_segmentation_page))
        .route(endpoints::BRANCHES_VIEW, get(get_branches_page))
        .route(endpoints::DATA_TABLES_VIEW, get(get_data_tables_page))
        .route(endpoints::VIEW_CSV, get(get_view_csv))
        .route(endpoints::CLEAR_CACHE, post(clear_cache))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the first report group.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::CHURN_VIEW)
}
