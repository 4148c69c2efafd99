//! Assembly of the insight aggregates.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Duration};

use crate::{AppState, Error, category::Category, timezone::local_today};

use super::{
    aggregation::{
        CategoryTotal, MonthBreakdown, MonthTotal, category_totals, expenses_in_month,
        expenses_in_year, monthly_breakdown, monthly_trend, top_category, total_amount,
    },
    query::{Expense, get_expenses_in_date_range},
};

/// How far back the trend and breakdown reach.
const TRAILING_PERIOD_DAYS: i64 = 365;

/// The state needed to compute insights.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// The database connection for reading bills.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g.
    /// "Pacific/Auckland". Determines which month is "this month".
    pub local_timezone: String,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The spending aggregates consumed by the dashboard and the insights API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Sum of all bills dated in the current calendar month.
    pub total_this_month: f64,
    /// Sum of all bills dated in the current calendar year.
    pub total_this_year: f64,
    /// The category with the largest sum this month, `null` when the month
    /// has no bills. Ties keep the first-encountered category.
    pub top_category_this_month: Option<Category>,
    /// Per-category totals for the current month, largest first.
    pub spending_by_category: Vec<CategoryTotal>,
    /// Per-category totals for the current year, largest first. Used as the
    /// chart fallback when the current month has no data.
    pub spending_by_category_year: Vec<CategoryTotal>,
    /// Monthly totals over the trailing year, chronological ascending.
    pub monthly_trend: Vec<MonthTotal>,
    /// Per-month category detail over the trailing year, most recent first.
    pub monthly_breakdown: Vec<MonthBreakdown>,
}

/// Compute all aggregates from the trailing year's expenses, as of `today`.
pub(super) fn compute_insights(expenses: &[Expense], today: Date) -> Insights {
    let this_month = expenses_in_month(expenses, today);
    let this_year = expenses_in_year(expenses, today);

    Insights {
        total_this_month: total_amount(&this_month),
        total_this_year: total_amount(&this_year),
        top_category_this_month: top_category(&this_month),
        spending_by_category: category_totals(&this_month),
        spending_by_category_year: category_totals(&this_year),
        monthly_trend: monthly_trend(expenses),
        monthly_breakdown: monthly_breakdown(expenses),
    }
}

/// Fetch the trailing year of bills and compute the insight aggregates.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] when the configured timezone is not
/// a canonical name, or [Error::SqlError] when the query fails.
pub(super) fn build_insights(
    connection: &Connection,
    local_timezone: &str,
) -> Result<Insights, Error> {
    let today = local_today(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", local_timezone);
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })?;

    let date_range = today - Duration::days(TRAILING_PERIOD_DAYS)..=today;
    let expenses = get_expenses_in_date_range(date_range, connection)
        .inspect_err(|error| tracing::error!("Could not get bills for insights: {error}"))?;

    Ok(compute_insights(&expenses, today))
}

#[cfg(test)]
mod core_tests {
    use time::macros::date;

    use crate::category::Category;
    use crate::insights::query::Expense;

    use super::compute_insights;

    fn expense(amount: f64, date: time::Date, category: Category) -> Expense {
        Expense {
            amount,
            date,
            category,
        }
    }

    #[test]
    fn march_bill_shows_in_march_insights() {
        let expenses = vec![expense(250.0, date!(2024 - 03 - 01), Category::Food)];

        let insights = compute_insights(&expenses, date!(2024 - 03 - 15));

        assert_eq!(insights.total_this_month, 250.0);
        assert_eq!(insights.total_this_year, 250.0);
        assert_eq!(insights.top_category_this_month, Some(Category::Food));
        assert_eq!(insights.spending_by_category.len(), 1);
        assert_eq!(insights.spending_by_category[0].category, Category::Food);
        assert_eq!(insights.spending_by_category[0].total, 250.0);
    }

    #[test]
    fn totals_bucket_by_stored_date() {
        let expenses = vec![
            expense(100.0, date!(2024 - 03 - 01), Category::Food),
            expense(40.0, date!(2024 - 03 - 31), Category::Travel),
            expense(25.0, date!(2024 - 02 - 10), Category::Food),
            expense(60.0, date!(2023 - 12 - 01), Category::Food),
        ];

        let insights = compute_insights(&expenses, date!(2024 - 03 - 15));

        assert_eq!(insights.total_this_month, 140.0);
        assert_eq!(insights.total_this_year, 165.0);
    }

    #[test]
    fn empty_month_has_no_top_category() {
        let expenses = vec![expense(60.0, date!(2024 - 02 - 01), Category::Food)];

        let insights = compute_insights(&expenses, date!(2024 - 03 - 15));

        assert_eq!(insights.top_category_this_month, None);
        assert!(insights.spending_by_category.is_empty());
        // The yearly breakdown still has data for the chart fallback.
        assert_eq!(insights.spending_by_category_year.len(), 1);
    }

    #[test]
    fn no_data_produces_zeroed_insights() {
        let insights = compute_insights(&[], date!(2024 - 03 - 15));

        assert_eq!(insights.total_this_month, 0.0);
        assert_eq!(insights.total_this_year, 0.0);
        assert_eq!(insights.top_category_this_month, None);
        assert!(insights.monthly_trend.is_empty());
        assert!(insights.monthly_breakdown.is_empty());
    }

    #[test]
    fn serializes_null_top_category() {
        let insights = compute_insights(&[], date!(2024 - 03 - 15));

        let json = serde_json::to_value(&insights).unwrap();
        assert_eq!(json["top_category_this_month"], serde_json::Value::Null);
    }
}
