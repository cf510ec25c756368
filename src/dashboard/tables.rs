//! Renders a view's rows as an HTML table.

use maud::{Markup, html};
use rusqlite::types::Value;

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
    view::{ViewTable, format_value},
};

const TABLE_NUMBER_CELL_STYLE: &str = "text-right tabular-nums whitespace-nowrap";

/// Renders every column and row of `table`, in order, with no index column.
pub(super) fn view_table(table: &ViewTable) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table
                class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                data-view=(table.view().sql_name())
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for column in table.columns() {
                            th scope="col" class=(TABLE_CELL_STYLE) { (column) }
                        }
                    }
                }

                tbody
                {
                    @for row in table.rows() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            @for value in row {
                                @if is_number(value) {
                                    td class={(TABLE_CELL_STYLE) " " (TABLE_NUMBER_CELL_STYLE)} {
                                        (format_value(value))
                                    }
                                } @else {
                                    td class=(TABLE_CELL_STYLE) { (format_value(value)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn is_number(value: &Value) -> bool {
    matches!(value, Value::Integer(_) | Value::Real(_))
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;
    use scraper::Html;

    use crate::{View, ViewTable, test_utils::select_text};

    use super::view_table;

    #[test]
    fn renders_header_and_rows_in_order() {
        let table = ViewTable::new(
            View::BranchPerformance,
            vec![
                "branch".to_owned(),
                "churn_rate_pct".to_owned(),
                "avg_balance".to_owned(),
            ],
            vec![
                vec![
                    Value::Text("Uptown".to_owned()),
                    Value::Real(21.5),
                    Value::Real(4800.0),
                ],
                vec![Value::Text("Airport".to_owned()), Value::Null, Value::Integer(12)],
            ],
        );

        let html = Html::parse_fragment(&view_table(&table).into_string());

        assert_eq!(
            select_text(&html, "th"),
            vec!["branch", "churn_rate_pct", "avg_balance"]
        );
        assert_eq!(
            select_text(&html, "tbody td"),
            vec!["Uptown", "21.5", "4800.0", "Airport", "", "12"]
        );
        assert_eq!(
            select_text(&html, "table[data-view='branch_performance'] tbody tr").len(),
            2
        );
    }
}
