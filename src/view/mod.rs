//! Reading the precomputed customer views from the database.
//!
//! The catalog fixes which views exist, the reader turns one view into a
//! [ViewTable], and the cache memoizes reads for one dashboard session.

mod cache;
mod catalog;
mod reader;
mod table;

pub use cache::ViewCache;
pub use catalog::View;
pub use reader::{load_view, open_database, read_view};
pub use table::{ViewTable, format_value};
