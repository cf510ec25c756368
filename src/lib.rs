//! Bank Customer Analytics is a dashboard and CSV exporter for the
//! precomputed customer views in a bank's SQLite database.
//!
//! This library provides the web app that serves the dashboard as HTML
//! pages, and the batch exporter used by the `export_views` binary.

#![warn(missing_docs)]

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod endpoints;
mod html;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod sample_db;
mod view;

pub mod export;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use logging::{add_tracing_layer, setup_cli_logging, setup_server_logging};
pub use routing::build_router;
pub use sample_db::create_sample_database;
pub use view::{View, ViewCache, ViewTable, load_view, open_database, read_view};

use crate::html::diagnostic_view;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The database file does not exist at the given path.
    ///
    /// This is fatal for a whole export run or dashboard page.
    #[error("database file '{}' not found", .0.display())]
    DatabaseNotFound(PathBuf),

    /// The view is in the catalog but not in the database schema.
    ///
    /// Usually means the view creation script has not been run yet.
    #[error("view '{}' does not exist", .0.sql_name())]
    ViewNotFound(View),

    /// A client asked for a view name that is not in the catalog.
    #[error("'{0}' is not a known view")]
    UnknownView(String),

    /// A view was loaded but lacks a column that a panel needs.
    #[error("view '{}' has no column '{column}'", .view.sql_name())]
    MissingColumn {
        /// The view that was read.
        view: View,
        /// The column that was expected.
        column: String,
    },

    /// A cell that should hold a number holds something else.
    #[error("view '{}' has a non-numeric value in column '{column}' at row {row}", .view.sql_name())]
    InvalidValue {
        /// The view that was read.
        view: View,
        /// The column holding the bad value.
        column: String,
        /// The zero-based row index of the bad value.
        row: usize,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// A view could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// A file or directory could not be read or written.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Could not acquire the view cache lock
    #[error("could not acquire the view cache lock")]
    CacheLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::IoError(value.to_string())
    }
}

impl Error {
    /// The HTTP status to use when this error ends a request.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownView(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The heading and remediation hint shown to the user for this error.
    fn diagnostic(&self) -> (String, String) {
        match self {
            Error::DatabaseNotFound(path) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());

                (
                    format!("Database file '{}' not found!", path.display()),
                    format!("Please ensure {file_name} exists in the current directory."),
                )
            }
            Error::ViewNotFound(_) | Error::SqlError(_) => (
                format!("Database error: {self}"),
                "Make sure you've created the views by running views.sql first!".to_owned(),
            ),
            Error::UnknownView(_) => (
                format!("Unknown view: {self}"),
                "Pick one of the views listed on the Data Tables page.".to_owned(),
            ),
            error => (
                format!("An error occurred: {error}"),
                "Check the server logs for more details.".to_owned(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!("Could not render the report: {}", self);
        }

        let (description, fix) = self.diagnostic();

        (
            self.status_code(),
            diagnostic_view("Error", &description, &fix),
        )
            .into_response()
    }
}
