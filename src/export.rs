//! Exports every catalog view to a CSV file.
//!
//! The exporter opens one connection for the whole run and keeps going when
//! a single view fails, so a broken view costs one file, not the batch.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use rusqlite::Connection;

use crate::{
    Error,
    view::{View, ViewTable, open_database, read_view},
};

const RULE_WIDTH: usize = 70;

/// Where the exporter reads from and writes to.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// The SQLite database containing the views.
    pub db_path: PathBuf,
    /// The directory the CSV files are written to. Created if missing.
    pub output_dir: PathBuf,
}

/// A view that was written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedView {
    /// The view that was exported.
    pub view: View,
    /// The number of data rows written, not counting the header.
    pub rows: usize,
    /// The file the view was written to.
    pub path: PathBuf,
}

/// The outcome of an export run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    /// The views written successfully, in catalog order.
    pub exported: Vec<ExportedView>,
    /// The views that could not be exported, in catalog order.
    pub failed: Vec<View>,
    /// Whether the run stopped before exporting anything, e.g. because the
    /// database file does not exist.
    pub aborted: bool,
}

impl ExportSummary {
    /// Whether every view in the catalog was exported.
    pub fn is_complete(&self) -> bool {
        !self.aborted && self.failed.is_empty() && self.exported.len() == View::ALL.len()
    }
}

/// Export every view in the catalog to `<output_dir>/<view>.csv`, printing
/// a line per view and a summary to `out`.
///
/// Failures are reported in `out` and in the returned summary. They never
/// end the run early, except for a missing database or an output directory
/// that cannot be created.
///
/// # Errors
/// Only returns an error if writing to `out` fails.
pub fn export_views<W: Write>(config: &ExportConfig, out: &mut W) -> io::Result<ExportSummary> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut summary = ExportSummary::default();

    writeln!(out, "{rule}")?;
    writeln!(out, "Bank Customer Analytics - View Exporter")?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;

    if !config.db_path.is_file() {
        writeln!(
            out,
            "[ERROR] Database file '{}' not found!",
            config.db_path.display()
        )?;
        writeln!(
            out,
            "  Make sure {} exists in the current directory.",
            display_file_name(&config.db_path)
        )?;
        summary.aborted = true;
        return Ok(summary);
    }

    if let Err(error) = fs::create_dir_all(&config.output_dir) {
        tracing::error!("could not create {:?}: {error}", config.output_dir);
        writeln!(
            out,
            "[ERROR] Could not create results folder '{}': {error}",
            config.output_dir.display()
        )?;
        summary.aborted = true;
        return Ok(summary);
    }
    writeln!(
        out,
        "[OK] Results folder '{}' ready",
        config.output_dir.display()
    )?;
    writeln!(out)?;

    let connection = match open_database(&config.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            writeln!(out, "[ERROR] Error connecting to database: {error}")?;
            summary.aborted = true;
            return Ok(summary);
        }
    };

    writeln!(out, "[OK] Connected to {}", config.db_path.display())?;
    writeln!(out)?;
    writeln!(out, "Exporting views to CSV...")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for view in View::ALL {
        match export_view(&connection, view, &config.output_dir) {
            Ok(exported) => {
                writeln!(
                    out,
                    "  [OK] Exported {:30} -> {:3} rows -> {}",
                    view.sql_name(),
                    exported.rows,
                    exported.path.display()
                )?;
                summary.exported.push(exported);
            }
            Err(Error::ViewNotFound(_)) => {
                writeln!(out, "  [ERROR] Error exporting {view}: View does not exist")?;
                writeln!(out, "    Hint: Make sure you've run views.sql first")?;
                summary.failed.push(view);
            }
            Err(error) => {
                writeln!(out, "  [ERROR] Error exporting {view}: {error}")?;
                summary.failed.push(view);
            }
        }
    }

    if let Err((_, error)) = connection.close() {
        tracing::warn!("could not close database connection: {error}");
    }

    let output_dir =
        fs::canonicalize(&config.output_dir).unwrap_or_else(|_| config.output_dir.clone());

    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    writeln!(
        out,
        "Summary: {}/{} views exported successfully",
        summary.exported.len(),
        View::ALL.len()
    )?;
    writeln!(out, "CSV files saved to: {}/", output_dir.display())?;
    writeln!(out, "{rule}")?;

    Ok(summary)
}

/// Read `view` and write it to `<output_dir>/<view>.csv`.
fn export_view(
    connection: &Connection,
    view: View,
    output_dir: &Path,
) -> Result<ExportedView, Error> {
    let table = read_view(connection, view)
        .inspect_err(|error| tracing::error!("could not read {view}: {error}"))?;
    let path = output_dir.join(view.csv_file_name());

    write_csv_file(&table, &path)
        .inspect_err(|error| tracing::error!("could not write {path:?}: {error}"))?;
    tracing::debug!("wrote {} rows of {view} to {path:?}", table.len());

    Ok(ExportedView {
        view,
        rows: table.len(),
        path,
    })
}

/// Write `table` next to `path` and move it into place once complete, so a
/// failed write never leaves a truncated file at `path`.
fn write_csv_file(table: &ViewTable, path: &Path) -> Result<(), Error> {
    let partial_path = path.with_extension("csv.partial");

    let result = File::create(&partial_path)
        .map_err(Error::from)
        .and_then(|file| table.write_csv(BufWriter::new(file)))
        .and_then(|()| fs::rename(&partial_path, path).map_err(Error::from));

    if result.is_err() && partial_path.exists() {
        if let Err(error) = fs::remove_file(&partial_path) {
            tracing::warn!("could not remove partial file {partial_path:?}: {error}");
        }
    }

    result
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
