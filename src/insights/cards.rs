//! The stat cards at the top of the dashboard.

use maud::{Markup, html};

use crate::html::format_currency;

use super::core::Insights;

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

const CARD_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400 mb-1";

const CARD_VALUE_STYLE: &str = "text-3xl font-bold";

/// Renders the row of summary cards: this month's total, this year's total,
/// and the month's top category.
pub(super) fn stat_cards(insights: &Insights) -> Markup {
    let top_category = insights
        .top_category_this_month
        .map(|category| category.label())
        .unwrap_or("—");

    html! {
        section class="w-full mx-auto mb-4" {
            div class="grid grid-cols-1 sm:grid-cols-3 gap-4" {
                div class=(CARD_STYLE) {
                    div class=(CARD_LABEL_STYLE) { "Spent this month" }
                    div class=(CARD_VALUE_STYLE) {
                        (format_currency(insights.total_this_month))
                    }
                }

                div class=(CARD_STYLE) {
                    div class=(CARD_LABEL_STYLE) { "Spent this year" }
                    div class=(CARD_VALUE_STYLE) {
                        (format_currency(insights.total_this_year))
                    }
                }

                div class=(CARD_STYLE) {
                    div class=(CARD_LABEL_STYLE) { "Top category this month" }
                    div class=(CARD_VALUE_STYLE) { (top_category) }
                }
            }
        }
    }
}
