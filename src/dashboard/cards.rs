//! The KPI strip: four summary cards shown above every group's panels.

use maud::{Markup, html};

use crate::{
    dashboard::kpi::Kpis,
    html::{format_count, format_currency, format_currency_rounded, format_percentage},
};

const CARD_STYLE: &str = "p-4 bg-white dark:bg-gray-800 rounded-lg shadow \
    border border-gray-200 dark:border-gray-700";

/// The label and formatted value of each card, in display order.
pub(super) fn kpi_card_values(kpis: &Kpis) -> [(&'static str, String); 4] {
    [
        ("Total Customers", format_count(kpis.total_customers)),
        ("Overall Churn Rate", format_percentage(kpis.churn_rate_pct)),
        ("Average Balance", format_currency(kpis.avg_balance)),
        ("Total Balance", format_currency_rounded(kpis.total_balance)),
    ]
}

/// Renders the row of KPI cards.
pub(super) fn kpi_strip(kpis: &Kpis) -> Markup {
    html! {
        section id="kpis" class="w-full mx-auto mb-8"
        {
            h2 class="text-xl font-semibold mb-4" { "Key Performance Indicators" }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                @for (label, value) in kpi_card_values(kpis) {
                    div class=(CARD_STYLE) data-kpi=(label)
                    {
                        p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
                        p class="kpi-value text-2xl font-bold mt-1" { (value) }
                    }
                }
            }
        }
    }
}
