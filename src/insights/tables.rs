//! The monthly breakdown table on the dashboard.

use maud::{Markup, html};

use crate::html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency};

use super::aggregation::{MonthBreakdown, month_display};

/// Renders the monthly breakdown as a table: one row per month, most recent
/// first, with a chip per category showing its total and bill count.
pub(super) fn monthly_breakdown_table(breakdown: &[MonthBreakdown]) -> Markup {
    html! {
        section class="w-full mx-auto mb-8" {
            h3 class="text-xl font-semibold mb-4" { "Month by Month" }

            div class="relative overflow-x-auto shadow-md sm:rounded-lg" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Categories" }
                        }
                    }

                    tbody {
                        @for month in breakdown {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (month_display(&month.month)) }

                                td class=(TABLE_CELL_STYLE) {
                                    (format_currency(month.total))
                                }

                                td class=(TABLE_CELL_STYLE) {
                                    div class="flex flex-wrap gap-2" {
                                        @for entry in &month.categories {
                                            span
                                                class="inline-flex items-center px-2.5 py-0.5
                                                    text-xs font-semibold text-white rounded-full"
                                                style=(format!(
                                                    "background-color: {}",
                                                    entry.category.color()
                                                ))
                                            {
                                                (entry.category.label())
                                                " "
                                                (format_currency(entry.total))
                                                " ×"
                                                (entry.count)
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
