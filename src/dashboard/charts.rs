//! Chart generation and rendering for the dashboard.
//!
//! Every chart is built from one view's table and serialized as JSON
//! options for the ECharts library. Builders fail with
//! [Error::MissingColumn] when the view lacks a column they plot, which the
//! caller renders as an inline alert for that panel.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title, VisualMap, VisualMapPiece},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, ItemStyle, JsFunction, Label,
        LabelPosition, LineStyle, Symbol, Tooltip, Trigger,
    },
    series::{Line, Pie, bar::Bar},
};
use maud::PreEscaped;

use crate::{Error, ViewTable, html::HeadElement};

/// Sequential red scale, light to dark.
const REDS: [&str; 5] = ["#fee5d9", "#fcae91", "#fb6a4a", "#de2d26", "#a50f15"];
/// Sequential green scale, light to dark.
const GREENS: [&str; 5] = ["#edf8e9", "#bae4b3", "#74c476", "#31a354", "#006d2c"];
/// Sequential blue scale, light to dark.
const BLUES: [&str; 5] = ["#eff3ff", "#bdd7e7", "#6baed6", "#3182bd", "#08519c"];
const QUALITATIVE: [&str; 8] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
];
const PASTEL: [&str; 8] = [
    "#66c5cc", "#f6cf71", "#f89c74", "#dcb0f2", "#87c55f", "#9eb9f3", "#fe88b1", "#c9db74",
];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    pub(super) fn new(id: &'static str, chart: Chart) -> Self {
        Self {
            id,
            options: chart.to_string(),
        }
    }
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[&DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// How the numbers on a value axis are shown.
#[derive(Debug, Clone, Copy)]
enum ValueFormat {
    Percentage,
    Currency,
}

impl ValueFormat {
    fn formatter(self) -> JsFunction {
        match self {
            ValueFormat::Percentage => percentage_formatter(),
            ValueFormat::Currency => currency_formatter(),
        }
    }
}

/// One categorical column on the x axis and one numeric column on the y axis.
struct Dimensions<'a> {
    category: &'a str,
    category_label: &'a str,
    value: &'a str,
    value_label: &'a str,
}

pub(super) fn churn_by_branch_chart(table: &ViewTable) -> Result<Chart, Error> {
    shaded_bar_chart(
        table,
        "Churn Rate by Branch",
        Dimensions {
            category: "branch",
            category_label: "Branch",
            value: "churn_rate_pct",
            value_label: "Churn Rate (%)",
        },
        &REDS,
        ValueFormat::Percentage,
    )
}

pub(super) fn churn_by_account_type_chart(table: &ViewTable) -> Result<Chart, Error> {
    pie_chart(
        table,
        "Churn Rate Distribution by Account Type",
        "account_type",
        "churn_rate_pct",
        &REDS,
    )
}

pub(super) fn income_band_churn_chart(table: &ViewTable) -> Result<Chart, Error> {
    let dimensions = Dimensions {
        category: "income_band",
        category_label: "Income Band",
        value: "churn_rate_pct",
        value_label: "Churn Rate (%)",
    };
    let labels = table.text_column(dimensions.category)?;
    let values = table.number_column(dimensions.value)?;

    Ok(
        category_chart("Churn Rate by Income Band", &dimensions, labels, ValueFormat::Percentage)
            .visual_map(shaded_visual_map(&values, &REDS))
            .series(
                Bar::new()
                    .name(dimensions.value_label)
                    .label(
                        Label::new()
                            .show(true)
                            .position(LabelPosition::Top)
                            .formatter(percentage_label_formatter()),
                    )
                    .data(values),
            ),
    )
}

pub(super) fn avg_balance_by_branch_chart(table: &ViewTable) -> Result<Chart, Error> {
    shaded_bar_chart(
        table,
        "Average Balance by Branch",
        Dimensions {
            category: "branch",
            category_label: "Branch",
            value: "avg_balance",
            value_label: "Average Balance ($)",
        },
        &GREENS,
        ValueFormat::Currency,
    )
}

pub(super) fn avg_balance_by_account_type_chart(table: &ViewTable) -> Result<Chart, Error> {
    shaded_bar_chart(
        table,
        "Average Balance by Account Type",
        Dimensions {
            category: "account_type",
            category_label: "Account Type",
            value: "avg_balance",
            value_label: "Average Balance ($)",
        },
        &BLUES,
        ValueFormat::Currency,
    )
}

pub(super) fn balance_by_tenure_chart(table: &ViewTable) -> Result<Chart, Error> {
    let dimensions = Dimensions {
        category: "tenure_group",
        category_label: "Tenure Group",
        value: "avg_balance",
        value_label: "Average Balance ($)",
    };
    let labels = table.text_column(dimensions.category)?;
    let values = table.number_column(dimensions.value)?;

    Ok(category_chart(
        "Average Balance by Customer Tenure",
        &dimensions,
        labels,
        ValueFormat::Currency,
    )
    .series(
        Line::new()
            .name(dimensions.value_label)
            .symbol(Symbol::Circle)
            .symbol_size(8.0)
            .data(values),
    ))
}

pub(super) fn account_type_distribution_chart(table: &ViewTable) -> Result<Chart, Error> {
    pie_chart(
        table,
        "Customer Distribution by Account Type",
        "account_type",
        "num_customers",
        &QUALITATIVE,
    )
}

pub(super) fn branch_distribution_chart(table: &ViewTable) -> Result<Chart, Error> {
    pie_chart(
        table,
        "Customer Distribution by Branch",
        "branch",
        "num_customers",
        &PASTEL,
    )
}

/// Churn rate as bars on the left axis and average balance as a line on
/// the right axis, one category per branch.
pub(super) fn branch_performance_chart(table: &ViewTable) -> Result<Chart, Error> {
    let branches = table.text_column("branch")?;
    let churn_rates = table.number_column("churn_rate_pct")?;
    let balances = table.number_column("avg_balance")?;

    Ok(Chart::new()
        .title(Title::new().text("Branch Performance: Churn Rate vs Average Balance"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().top("bottom"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom(40)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Branch")
                .data(branches),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Churn Rate (%)")
                .axis_label(AxisLabel::new().formatter(percentage_formatter())),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Average Balance ($)")
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Churn Rate (%)")
                .item_style(ItemStyle::new().color("lightcoral"))
                .data(churn_rates),
        )
        .series(
            Line::new()
                .name("Avg Balance ($)")
                .y_axis_index(1)
                .symbol(Symbol::Circle)
                .symbol_size(8.0)
                .item_style(ItemStyle::new().color("green"))
                .line_style(LineStyle::new().color("green").width(3.0))
                .data(balances),
        ))
}

/// A bar chart whose bars are shaded by their value along `palette`.
fn shaded_bar_chart(
    table: &ViewTable,
    title: &str,
    dimensions: Dimensions<'_>,
    palette: &[&str],
    format: ValueFormat,
) -> Result<Chart, Error> {
    let labels = table.text_column(dimensions.category)?;
    let values = table.number_column(dimensions.value)?;

    Ok(category_chart(title, &dimensions, labels, format)
        .visual_map(shaded_visual_map(&values, palette))
        .series(Bar::new().name(dimensions.value_label).data(values)))
}

/// Title, axes and tooltip shared by the single series category charts.
fn category_chart(
    title: &str,
    dimensions: &Dimensions<'_>,
    labels: Vec<String>,
    format: ValueFormat,
) -> Chart {
    Chart::new()
        .title(Title::new().text(title))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(format.formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name(dimensions.category_label)
                .data(labels),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name(dimensions.value_label)
                .axis_label(AxisLabel::new().formatter(format.formatter())),
        )
}

fn pie_chart(
    table: &ViewTable,
    title: &str,
    names: &str,
    values: &str,
    palette: &[&str],
) -> Result<Chart, Error> {
    let names = table.text_column(names)?;
    let values = table.number_column(values)?;
    let data: Vec<(f64, &str)> = values
        .into_iter()
        .zip(names.iter().map(String::as_str))
        .collect();

    Ok(Chart::new()
        .title(Title::new().text(title))
        .color(palette.iter().map(|&color| Color::from(color)).collect())
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name(title)
                .radius(vec!["0%", "65%"])
                .data(data),
        ))
}

/// Splits the range of `values` into one band per colour in `palette`, so
/// larger values get darker colours.
fn shaded_visual_map(values: &[f64], palette: &[&str]) -> VisualMap {
    VisualMap::new()
        .show(false)
        .pieces(shade_pieces(values, palette))
}

fn shade_pieces(values: &[f64], palette: &[&str]) -> Vec<VisualMapPiece> {
    let (min, max) = value_range(values);

    if palette.is_empty() {
        return Vec::new();
    }

    if max - min <= f64::EPSILON {
        let darkest = palette[palette.len() - 1];
        return vec![VisualMapPiece::new().gte(min).lte(max).color(darkest)];
    }

    let step = (max - min) / palette.len() as f64;

    palette
        .iter()
        .enumerate()
        .map(|(index, &color)| {
            let lower = min + step * index as f64;
            let upper = if index + 1 == palette.len() {
                max
            } else {
                min + step * (index + 1) as f64
            };

            VisualMapPiece::new().gte(lower).lte(upper).color(color)
        })
        .collect()
}

/// The smallest and largest of `values`, or `(0.0, 0.0)` if there are none.
fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .copied()
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
        .unwrap_or((0.0, 0.0))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD',
              maximumFractionDigits: 0
            });
            return (number || number === 0) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[inline]
fn percentage_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "return (number || number === 0) ? Number(number).toFixed(1) + '%' : \"-\";",
    )
}

/// Bar labels receive the data point, not the bare value.
#[inline]
fn percentage_label_formatter() -> JsFunction {
    JsFunction::new_with_args("params", "return Number(params.value).toFixed(1) + '%';")
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use crate::{Error, View, ViewTable};

    use super::{
        REDS, branch_performance_chart, churn_by_branch_chart, income_band_churn_chart,
        shade_pieces, value_range,
    };

    fn table(view: View, columns: &[&str], rows: Vec<Vec<Value>>) -> ViewTable {
        ViewTable::new(
            view,
            columns.iter().map(|&column| column.to_owned()).collect(),
            rows,
        )
    }

    fn churn_by_branch() -> ViewTable {
        table(
            View::ChurnByBranch,
            &["branch", "churn_rate_pct"],
            vec![
                vec![Value::Text("Downtown".to_owned()), Value::Real(12.5)],
                vec![Value::Text("Uptown".to_owned()), Value::Real(21.75)],
            ],
        )
    }

    #[test]
    fn bar_chart_contains_categories_and_values() {
        let options = churn_by_branch_chart(&churn_by_branch()).unwrap().to_string();

        assert!(options.contains("Churn Rate by Branch"), "{options}");
        assert!(options.contains("Downtown"));
        assert!(options.contains("Uptown"));
        assert!(options.contains("21.75"));
        assert!(options.contains(REDS[4]));
    }

    #[test]
    fn missing_column_is_reported() {
        let table = table(
            View::IncomeBandChurn,
            &["income_band"],
            vec![vec![Value::Text("$120k+".to_owned())]],
        );

        let result = income_band_churn_chart(&table);

        assert_eq!(
            result.err(),
            Some(Error::MissingColumn {
                view: View::IncomeBandChurn,
                column: "churn_rate_pct".to_owned(),
            })
        );
    }

    #[test]
    fn branch_performance_uses_two_axes() {
        let table = table(
            View::BranchPerformance,
            &["branch", "churn_rate_pct", "avg_balance"],
            vec![vec![
                Value::Text("Airport".to_owned()),
                Value::Real(18.2),
                Value::Real(5120.0),
            ]],
        );

        let options = branch_performance_chart(&table).unwrap().to_string();

        assert!(options.contains("Average Balance ($)"), "{options}");
        assert!(options.contains("lightcoral"));
        assert!(options.contains("Avg Balance ($)"));
    }

    #[test]
    fn pieces_cover_value_range() {
        let pieces = shade_pieces(&[10.0, 20.0, 30.0], &["#fff", "#888", "#000"]);

        assert_eq!(pieces.len(), 3);
    }

    #[test]
    fn equal_values_get_one_piece() {
        let pieces = shade_pieces(&[5.0, 5.0], &REDS);

        assert_eq!(pieces.len(), 1);
    }

    #[test]
    fn value_range_of_empty_slice() {
        assert_eq!(value_range(&[]), (0.0, 0.0));
        assert_eq!(value_range(&[3.0, -1.0, 2.0]), (-1.0, 3.0));
    }
}
