//! Implements a struct that holds the state of the dashboard server.

use std::{path::PathBuf, sync::Arc};

use crate::view::ViewCache;

/// The state of the dashboard server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The views read so far in this session, shared by every request.
    pub cache: Arc<ViewCache>,
}

impl AppState {
    /// Create a new [AppState] that reads views from the SQLite database at `db_path`.
    ///
    /// The database is not opened until the first request, so a missing file
    /// is reported on the page rather than at startup.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            cache: Arc::new(ViewCache::new(db_path)),
        }
    }
}
