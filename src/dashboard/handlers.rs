//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the report group pages and the data tables page
//! - The CSV download and cache clearing endpoints
//! - HTML view functions shared by those pages

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, VARY},
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::{HxHistoryRestoreRequest, HxRequest};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    dashboard::{
        cards::kpi_strip,
        charts::charts_script,
        kpi::{Kpis, load_kpis},
        panels::{ReportGroup, panel_charts, panels_view},
        tables::view_table,
    },
    endpoints::{self, format_view_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, ECHARTS_CDN, FORM_LABEL_STYLE, FORM_SELECT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    view::{View, ViewCache, ViewTable},
};

const DATA_TABLE_ID: &str = "data-table";
const HX_REQUEST_HEADER: &str = "HX-Request";

/// The state needed for displaying the dashboard pages.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The views read so far in this session.
    pub cache: Arc<ViewCache>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cache: state.cache.clone(),
        }
    }
}

/// The query string of the data tables page.
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    /// The SQL name of the view to show. Defaults to the first view.
    pub view: Option<String>,
}

/// Display the churn analysis group.
pub async fn get_churn_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    render_report(&state.cache, ReportGroup::Churn)
}

/// Display the balance analysis group.
pub async fn get_balance_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    render_report(&state.cache, ReportGroup::Balance)
}

/// Display the customer segmentation group.
pub async fn get_segmentation_page(
    State(state): State<DashboardState>,
) -> Result<Response, Error> {
    render_report(&state.cache, ReportGroup::Segmentation)
}

/// Display the branch performance group.
pub async fn get_branches_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    render_report(&state.cache, ReportGroup::BranchPerformance)
}

/// Display the data tables page, or only the selected table for htmx requests.
///
/// The picker pushes its URL into the browser history, so htmx restoring
/// that history entry gets the whole page. Responses vary on `HX-Request`
/// since one URL serves both shapes.
pub async fn get_data_tables_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    HxHistoryRestoreRequest(is_history_restore): HxHistoryRestoreRequest,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let view = match query.view {
        Some(name) => View::from_sql_name(&name).ok_or(Error::UnknownView(name))?,
        None => View::ALL[0],
    };

    let markup = if is_htmx_request && !is_history_restore {
        data_table_fragment(&state.cache, view)
    } else {
        data_tables_view(&state.cache, view)?
    };

    Ok(([(VARY, HX_REQUEST_HEADER)], markup).into_response())
}

/// Download one view as a CSV file.
pub async fn get_view_csv(
    State(state): State<DashboardState>,
    Path(view_name): Path<String>,
) -> Result<Response, Error> {
    let view = View::from_sql_name(&view_name).ok_or(Error::UnknownView(view_name))?;
    let table = state.cache.get(view)?;
    let body = table
        .to_csv()
        .inspect_err(|error| tracing::error!("could not encode {view} as CSV: {error}"))?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", view.csv_file_name()),
            ),
        ],
        body,
    )
        .into_response())
}

/// Forget every cached view so the next page load queries the database again.
pub async fn clear_cache(State(state): State<DashboardState>) -> Redirect {
    state.cache.clear();
    tracing::info!("cleared the view cache");

    Redirect::to(endpoints::ROOT)
}

/// Fetch the KPIs and the panels of `group` and render its page.
///
/// # Errors
/// Returns an error if the KPIs could not be read for any reason other
/// than the view being absent or empty.
fn render_report(cache: &ViewCache, group: ReportGroup) -> Result<Response, Error> {
    let Some(kpis) = load_kpis(cache)? else {
        return Ok(no_data_view(group.endpoint()).into_response());
    };

    let panels = group.panels(cache);
    let head_elements = vec![
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        charts_script(&panel_charts(&panels)),
    ];

    Ok(report_view(
        group.endpoint(),
        group.title(),
        group.heading(),
        &kpis,
        &panels_view(&panels),
        head_elements,
    )
    .into_response())
}

/// The page layout shared by every group: navigation, KPI strip, heading
/// and the group's content.
fn report_view(
    endpoint: &str,
    title: &str,
    heading: &str,
    kpis: &Kpis,
    content: &Markup,
    head_elements: Vec<HeadElement>,
) -> Markup {
    let nav_bar = NavBar::new(endpoint).into_html();

    let content = html!(
        (nav_bar)

        main id="report" class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-2" { "Bank Customer Analytics Dashboard" }
            p class="mb-6 text-gray-600 dark:text-gray-400"
            {
                "Churn, balances and customer segments from the precomputed database views."
            }

            (kpi_strip(kpis))

            h2 class="text-2xl font-semibold mb-4" { (heading) }

            (content)
        }
    );

    base(title, &head_elements, &content)
}

/// Renders the page shown when the database has no KPI data.
fn no_data_view(endpoint: &str) -> Markup {
    let nav_bar = NavBar::new(endpoint).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl mx-auto"
            {
                (Alert::info("No data found. Please ensure views are created in the database.").into_html())
            }
        }
    );

    base("No Data", &[], &content)
}

fn data_tables_view(cache: &ViewCache, view: View) -> Result<Markup, Error> {
    let Some(kpis) = load_kpis(cache)? else {
        return Ok(no_data_view(endpoints::DATA_TABLES_VIEW));
    };

    let content = html! {
        (data_table_picker(view))
        (data_table_fragment(cache, view))
    };

    Ok(report_view(
        endpoints::DATA_TABLES_VIEW,
        "Data Tables",
        "Data Tables",
        &kpis,
        &content,
        Vec::new(),
    ))
}

fn data_table_picker(selected: View) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DATA_TABLES_VIEW)
            class="flex flex-col sm:flex-row sm:items-end gap-4 mb-6"
        {
            div class="w-full sm:max-w-md"
            {
                label for="view-select" class=(FORM_LABEL_STYLE) { "Select a view to display" }

                select
                    id="view-select"
                    name="view"
                    class=(FORM_SELECT_STYLE)
                    hx-get=(endpoints::DATA_TABLES_VIEW)
                    hx-target={"#" (DATA_TABLE_ID)}
                    hx-swap="outerHTML"
                    hx-push-url="true"
                    hx-indicator="#indicator"
                {
                    @for view in View::ALL {
                        option value=(view.sql_name()) selected[view == selected] {
                            (view.label())
                        }
                    }
                }
            }

            noscript
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
            }

            span id="indicator" class="text-sm text-gray-500"
            {
                span class="htmx-indicator" { "Loading..." }
            }
        }
    }
}

/// The selected view's table with its download link, swapped in by htmx.
fn data_table_fragment(cache: &ViewCache, view: View) -> Markup {
    let download_url = format_view_endpoint(endpoints::VIEW_CSV, view);

    let table = match cache.get(view) {
        Ok(table) => table_or_notice(&table),
        Err(error) => {
            tracing::error!("Error loading {view}: {error}");
            let (description, _) = error.diagnostic();
            Alert::error(&description).into_html()
        }
    };

    html! {
        section id=(DATA_TABLE_ID) class="flex flex-col gap-4" data-view=(view.sql_name())
        {
            div class="flex items-center justify-between"
            {
                h3 class="text-lg font-semibold" { (view.label()) }

                a href=(download_url) class=(BUTTON_PRIMARY_STYLE) download=(view.csv_file_name())
                {
                    "Download as CSV"
                }
            }

            (table)
        }
    }
}

fn table_or_notice(table: &ViewTable) -> Markup {
    if table.is_empty() {
        Alert::info("This view has no rows.").into_html()
    } else {
        view_table(table)
    }
}
