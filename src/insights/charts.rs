//! Chart generation for the dashboard.
//!
//! Three charts are built from the insight aggregates:
//! - **Spending by Category**: pie of the current month's categories,
//!   falling back to the current year when the month has no bills
//! - **Spending Trend**: monthly totals over the trailing year
//! - **Monthly Breakdown**: stacked bars of each month's categories
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered into its HTML container by a small initialization script.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Line, Pie, bar},
};
use maud::PreEscaped;

use crate::{category::Category, html::HeadElement};

use super::{
    aggregation::{MonthBreakdown, MonthTotal, month_display},
    core::Insights,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Creates the array of dashboard charts from the insight aggregates.
pub(super) fn build_dashboard_charts(insights: &Insights) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "category-chart",
            options: category_chart(insights).to_string(),
        },
        DashboardChart {
            id: "trend-chart",
            options: trend_chart(&insights.monthly_trend).to_string(),
        },
        DashboardChart {
            id: "breakdown-chart",
            options: breakdown_chart(&insights.monthly_breakdown).to_string(),
        },
    ]
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
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

/// Pie chart of per-category spending.
///
/// Uses the current month's categories, or the current year's when the month
/// has no bills yet.
fn category_chart(insights: &Insights) -> Chart {
    let (totals, subtitle) = if insights.spending_by_category.is_empty() {
        (&insights.spending_by_category_year, "This year")
    } else {
        (&insights.spending_by_category, "This month")
    };

    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|entry| (entry.total, entry.category.label()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Spending by Category")
                .subtext(subtitle),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .series(
            Pie::new()
                .name("Spending")
                .radius("55%")
                .data(data),
        )
}

/// Line chart of total spending per month, chronological ascending.
fn trend_chart(trend: &[MonthTotal]) -> Chart {
    let labels: Vec<String> = trend
        .iter()
        .map(|entry| month_display(&entry.month))
        .collect();
    let values: Vec<f64> = trend.iter().map(|entry| entry.total).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Spending Trend")
                .subtext("Last twelve months"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Total").data(values))
}

/// Stacked bar chart of per-category totals for each month.
fn breakdown_chart(breakdown: &[MonthBreakdown]) -> Chart {
    // The breakdown arrives most recent first; the x-axis reads left to
    // right chronologically.
    let months: Vec<&MonthBreakdown> = breakdown.iter().rev().collect();
    let labels: Vec<String> = months
        .iter()
        .map(|month| month_display(&month.month))
        .collect();

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Monthly Breakdown")
                .subtext("Last twelve months, by category")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for category in Category::ALL {
        let data: Vec<Option<f64>> = months
            .iter()
            .map(|month| {
                month
                    .categories
                    .iter()
                    .find(|entry| entry.category == category)
                    .map(|entry| entry.total)
            })
            .collect();

        if data.iter().all(Option::is_none) {
            continue;
        }

        chart = chart.series(
            bar::Bar::new()
                .name(category.label())
                .stack("Spending")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values on axis charts.
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
