use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision, Scales};

use crate::{alert::Alert, endpoints, navigation::NavBar};

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "inline-flex items-center px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 hover:bg-blue-600 dark:hover:bg-blue-700 text-white \
    text-sm font-medium rounded";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_SELECT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 border \
    border-gray-300 dark:border-gray-600 focus:ring-blue-600 \
    focus:border-blue-600 focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "flex flex-col px-2 lg:px-6 py-8 mx-auto \
    max-w-screen-xl text-gray-900 dark:text-white";

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const HTMX_CDN: &str = "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js";
pub const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Bank Customer Analytics" }

                script src=(TAILWIND_CDN) {}
                script src=(HTMX_CDN) {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                footer class="py-6 text-center text-sm text-gray-500"
                {
                    "Bank Customer Analytics Dashboard"
                }
            }
        }
    }
}

/// A page that replaces the whole report with a single diagnostic.
///
/// `description` says what went wrong and `fix` how to remedy it.
pub fn diagnostic_view(title: &str, description: &str, fix: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-4 w-full max-w-3xl mx-auto"
            {
                (Alert::error(description).into_html())
                (Alert::info(fix).into_html())
            }
        }
    );

    base(title, &[], &content)
}

/// A full page error with a large `header`, e.g. "404", and a link back to the dashboard.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a href=(endpoints::ROOT) class={(BUTTON_PRIMARY_STYLE) " my-4"}
                    {
                        "Back to the Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// Format a whole number with thousands separators, e.g. "12,345".
pub fn format_count(number: i64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::new()
            .scales(Scales::none())
            .separator(',')
            .expect("',' is a valid separator")
            .precision(Precision::Decimals(0))
    });

    match number {
        // Zero is hardcoded as "0" by numfmt, keep it explicit
        0 => "0".to_owned(),
        number if number < 0 => format!("-{}", fmt.fmt_string(number.unsigned_abs() as f64)),
        number => fmt.fmt_string(number as f64),
    }
}

/// Format a percentage with one decimal place, e.g. "7.3%".
///
/// Halves round away from zero, so 7.25 is shown as "7.3%".
pub fn format_percentage(percentage: f64) -> String {
    let rounded = (percentage * 10.0).round() / 10.0;

    format!("{rounded:.1}%")
}

pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("'$' is a valid currency prefix")
            .scales(Scales::none())
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("'-$' is a valid currency prefix")
            .scales(Scales::none())
            .precision(Precision::Decimals(2))
    });

    let formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    // numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3".
    pad_decimals(formatted_string, 2)
}

pub fn format_currency_rounded(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("'$' is a valid currency prefix")
            .scales(Scales::none())
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("'-$' is a valid currency prefix")
            .scales(Scales::none())
            .precision(Precision::Decimals(0))
    });

    let number = number.round();

    let formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0".to_owned()
    };

    formatted_string.trim_end_matches('.').to_owned()
}

/// Pad `number` with zeros so it has exactly `decimals` digits after the point.
fn pad_decimals(mut number: String, decimals: usize) -> String {
    let existing = match number.find('.') {
        Some(point) => number.len() - point - 1,
        None => {
            number.push('.');
            0
        }
    };

    for _ in existing..decimals {
        number.push('0');
    }

    number
}

#[cfg(test)]
mod tests {
    use super::{
        format_count, format_currency, format_currency_rounded, format_percentage, pad_decimals,
    };

    #[test]
    fn formats_counts_with_separators() {
        assert_eq!(format_count(12345), "12,345");
        assert_eq!(format_count(1_000_000), "1,000,000");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(0), "0");
    }

    #[test]
    fn formats_percentage_with_one_decimal() {
        assert_eq!(format_percentage(7.25), "7.3%");
        assert_eq!(format_percentage(12.0), "12.0%");
        assert_eq!(format_percentage(0.04), "0.0%");
    }

    #[test]
    fn formats_currency_with_cents() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(-20.1), "-$20.10");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn formats_currency_rounded_to_dollars() {
        assert_eq!(format_currency_rounded(9876543.0), "$9,876,543");
        assert_eq!(format_currency_rounded(1234.5), "$1,235");
        assert_eq!(format_currency_rounded(0.2), "$0");
    }

    #[test]
    fn pads_missing_decimals() {
        assert_eq!(pad_decimals("$5".to_owned(), 2), "$5.00");
        assert_eq!(pad_decimals("$5.1".to_owned(), 2), "$5.10");
        assert_eq!(pad_decimals("$5.12".to_owned(), 2), "$5.12");
    }
}
