//! The in-memory result of reading one view.

use std::io::Write;

use rusqlite::types::Value;

use crate::{Error, view::View};

/// The columns and rows returned by `SELECT *` on one view.
///
/// Column order is the order the view selects them in, and row order is
/// the order the query returned them in.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTable {
    view: View,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ViewTable {
    /// Create a table from its parts.
    ///
    /// Every row should have one value per column.
    pub fn new(view: View, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));

        Self {
            view,
            columns,
            rows,
        }
    }

    /// A table with no columns and no rows, used in place of a view that
    /// could not be loaded.
    pub fn empty(view: View) -> Self {
        Self::new(view, Vec::new(), Vec::new())
    }

    /// The view this table was read from.
    pub fn view(&self) -> View {
        self.view
    }

    /// The column names in the order the view selects them.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows in the order the query returned them.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The position of the column called `name`.
    ///
    /// # Errors
    /// Returns [Error::MissingColumn] if the view has no such column.
    pub fn column_index(&self, name: &str) -> Result<usize, Error> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| Error::MissingColumn {
                view: self.view,
                column: name.to_owned(),
            })
    }

    /// The values of column `name` as display text.
    ///
    /// # Errors
    /// Returns [Error::MissingColumn] if the view has no such column.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>, Error> {
        let index = self.column_index(name)?;

        Ok(self.rows.iter().map(|row| format_value(&row[index])).collect())
    }

    /// The values of column `name` as numbers.
    ///
    /// # Errors
    /// Returns [Error::MissingColumn] if the view has no such column, or
    /// [Error::InvalidValue] if a cell is NULL or not a number.
    pub fn number_column(&self, name: &str) -> Result<Vec<f64>, Error> {
        let index = self.column_index(name)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                as_number(&row[index]).ok_or_else(|| Error::InvalidValue {
                    view: self.view,
                    column: name.to_owned(),
                    row: row_index,
                })
            })
            .collect()
    }

    /// A copy of this table that keeps only `columns`, in the given order.
    ///
    /// # Errors
    /// Returns [Error::MissingColumn] if any of `columns` is missing.
    pub fn project(&self, columns: &[&str]) -> Result<ViewTable, Error> {
        let indices = columns
            .iter()
            .map(|column| self.column_index(column))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&index| row[index].clone()).collect())
            .collect();

        Ok(ViewTable::new(
            self.view,
            columns.iter().map(|&column| column.to_owned()).collect(),
            rows,
        ))
    }

    /// Write the table as CSV: a header row of column names followed by
    /// one record per row.
    ///
    /// # Errors
    /// Returns [Error::CsvError] or [Error::IoError] if `writer` fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut writer = csv::Writer::from_writer(writer);

        writer.write_record(&self.columns)?;

        for row in &self.rows {
            writer.write_record(row.iter().map(format_value))?;
        }

        writer.flush()?;

        Ok(())
    }

    /// The table as CSV bytes, see [ViewTable::write_csv].
    pub fn to_csv(&self) -> Result<Vec<u8>, Error> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;

        Ok(buffer)
    }
}

/// Format a SQLite value as it appears in CSV files and HTML tables.
///
/// Reals always keep a fractional digit (e.g. "1234.0") so they can be
/// told apart from integers when a file is read back.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(integer) => integer.to_string(),
        Value::Real(real) if real.is_finite() && real.fract() == 0.0 => format!("{real:.1}"),
        Value::Real(real) => real.to_string(),
        Value::Text(text) => text.clone(),
        Value::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(integer) => Some(*integer as f64),
        Value::Real(real) => Some(*real),
        Value::Text(text) => text.trim().parse().ok(),
        Value::Null | Value::Blob(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use crate::{Error, View, view::format_value};

    use super::ViewTable;

    fn branch_table() -> ViewTable {
        ViewTable::new(
            View::ChurnByBranch,
            vec!["branch".to_owned(), "churn_rate_pct".to_owned()],
            vec![
                vec![Value::Text("Uptown".to_owned()), Value::Real(21.5)],
                vec![Value::Text("Downtown".to_owned()), Value::Integer(12)],
            ],
        )
    }

    #[test]
    fn reads_columns_by_name() {
        let table = branch_table();

        assert_eq!(
            table.text_column("branch").unwrap(),
            vec!["Uptown", "Downtown"]
        );
        assert_eq!(
            table.number_column("churn_rate_pct").unwrap(),
            vec![21.5, 12.0]
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        let table = branch_table();

        assert_eq!(
            table.number_column("avg_balance"),
            Err(Error::MissingColumn {
                view: View::ChurnByBranch,
                column: "avg_balance".to_owned()
            })
        );
    }

    #[test]
    fn null_is_not_a_number() {
        let table = ViewTable::new(
            View::OverallKpis,
            vec!["avg_balance".to_owned()],
            vec![vec![Value::Real(1.0)], vec![Value::Null]],
        );

        assert_eq!(
            table.number_column("avg_balance"),
            Err(Error::InvalidValue {
                view: View::OverallKpis,
                column: "avg_balance".to_owned(),
                row: 1
            })
        );
    }

    #[test]
    fn project_keeps_requested_order() {
        let table = branch_table().project(&["churn_rate_pct", "branch"]).unwrap();

        assert_eq!(table.columns(), ["churn_rate_pct", "branch"]);
        assert_eq!(
            table.rows()[0],
            vec![Value::Real(21.5), Value::Text("Uptown".to_owned())]
        );
    }

    #[test]
    fn writes_csv_with_header_and_no_index() {
        let csv = String::from_utf8(branch_table().to_csv().unwrap()).unwrap();

        assert_eq!(csv, "branch,churn_rate_pct\nUptown,21.5\nDowntown,12\n");
    }

    #[test]
    fn writes_header_for_table_without_rows() {
        let table = ViewTable::new(
            View::HighValueCustomers,
            vec!["customer_id".to_owned()],
            vec![],
        );

        assert_eq!(
            String::from_utf8(table.to_csv().unwrap()).unwrap(),
            "customer_id\n"
        );
    }

    #[test]
    fn quotes_text_containing_commas() {
        let table = ViewTable::new(
            View::BranchDistribution,
            vec!["branch".to_owned()],
            vec![vec![Value::Text("Smith, North".to_owned())]],
        );

        assert_eq!(
            String::from_utf8(table.to_csv().unwrap()).unwrap(),
            "branch\n\"Smith, North\"\n"
        );
    }

    #[test]
    fn formats_values() {
        assert_eq!(format_value(&Value::Null), "");
        assert_eq!(format_value(&Value::Integer(-3)), "-3");
        assert_eq!(format_value(&Value::Real(1234.0)), "1234.0");
        assert_eq!(format_value(&Value::Real(7.25)), "7.25");
        assert_eq!(format_value(&Value::Text("Savings".to_owned())), "Savings");
    }
}
