//! Runs `SELECT *` against a catalog view.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, types::Value};

use crate::{
    Error,
    view::{View, ViewTable},
};

/// Open the database at `path` for reading.
///
/// The database is opened read-only, so a missing file is reported rather
/// than created.
///
/// # Errors
/// Returns [Error::DatabaseNotFound] if there is no file at `path`, or
/// [Error::SqlError] if SQLite cannot open it.
pub fn open_database(path: &Path) -> Result<Connection, Error> {
    if !path.is_file() {
        return Err(Error::DatabaseNotFound(path.to_owned()));
    }

    let connection = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    Ok(connection)
}

/// Read every row of `view` using an open `connection`.
///
/// The reader imposes no ordering, rows come back in the order the view
/// produces them.
///
/// # Errors
/// Returns [Error::ViewNotFound] if the database has no such view, or
/// [Error::SqlError] for any other SQLite failure.
pub fn read_view(connection: &Connection, view: View) -> Result<ViewTable, Error> {
    // The view name comes from the catalog, never from a client.
    let query = format!("SELECT * FROM {}", view.sql_name());

    let mut statement = connection
        .prepare(&query)
        .map_err(|error| map_view_error(error, view))?;

    let columns: Vec<String> = statement
        .column_names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let column_count = columns.len();

    let rows = statement
        .query_map([], |row| {
            (0..column_count)
                .map(|index| row.get::<_, Value>(index))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|error| map_view_error(error, view))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| map_view_error(error, view))?;

    Ok(ViewTable::new(view, columns, rows))
}

/// Read `view` from the database at `path` with a connection that is
/// opened for this call and closed when it returns.
///
/// # Errors
/// See [open_database] and [read_view].
pub fn load_view(path: &Path, view: View) -> Result<ViewTable, Error> {
    let connection = open_database(path)?;

    read_view(&connection, view)
}

fn map_view_error(error: rusqlite::Error, view: View) -> Error {
    let message = match &error {
        rusqlite::Error::SqliteFailure(_, Some(message)) => message.as_str(),
        rusqlite::Error::SqlInputError { msg, .. } => msg.as_str(),
        _ => "",
    };

    if message.starts_with("no such table") {
        tracing::debug!("view {view} is missing from the database: {message}");
        Error::ViewNotFound(view)
    } else {
        Error::from(error)
    }
}
