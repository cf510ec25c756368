//! The API endpoints URIs.
//!
//! For endpoints that take a view parameter, e.g., '/api/views/{view}/csv', use [format_view_endpoint].

use crate::View;

/// The root route which redirects to the first dashboard group.
pub const ROOT: &str = "/";
/// The churn analysis group.
pub const CHURN_VIEW: &str = "/churn";
/// The balance analysis group.
pub const BALANCE_VIEW: &str = "/balance";
/// The customer segmentation group.
pub const SEGMENTATION_VIEW: &str = "/segmentation";
/// The branch performance group.
pub const BRANCHES_VIEW: &str = "/branches";
/// The page for browsing the raw view tables.
pub const DATA_TABLES_VIEW: &str = "/tables";

/// The route to download one view as CSV.
pub const VIEW_CSV: &str = "/api/views/{view}/csv";
/// The route to clear the session's cached views.
pub const CLEAR_CACHE: &str = "/api/cache/clear";

/// Replace the `{view}` parameter in `endpoint_path` with the SQL name of `view`.
///
/// If no parameter is found in `endpoint_path`, it is returned unchanged.
pub fn format_view_endpoint(endpoint_path: &str, view: View) -> String {
    endpoint_path.replacen("{view}", view.sql_name(), 1)
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::{View, endpoints};

    use super::format_view_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::CHURN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::BALANCE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SEGMENTATION_VIEW);
        assert_endpoint_is_valid_uri(endpoints::BRANCHES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DATA_TABLES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CLEAR_CACHE);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_view_endpoint(endpoints::VIEW_CSV, View::OverallKpis);

        assert_eq!(formatted_path, "/api/views/overall_kpis/csv");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_view_endpoint("/hello/world", View::OverallKpis);

        assert_eq!(formatted_path, "/hello/world");
    }
}
