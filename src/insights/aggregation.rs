//! Bill aggregation for the insight endpoints and dashboard charts.
//!
//! All functions bucket by the bill's stored date. "First encountered" in
//! the tie-break rules means the storage order the expenses arrive in.

use serde::Serialize;
use time::{Date, Month};

use crate::category::Category;

use super::query::Expense;

/// A category and the summed amount spent on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The spending category.
    pub category: Category,
    /// The summed amount.
    pub total: f64,
}

/// One month of the spending trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    /// The calendar month as "YYYY-MM".
    pub month: String,
    /// The summed amount for that month.
    pub total: f64,
}

/// Per-category detail within one month of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// The spending category.
    pub category: Category,
    /// The summed amount for the category in the month.
    pub total: f64,
    /// How many bills contributed to the total.
    pub count: u32,
}

/// One month of the breakdown: the month's total and its categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBreakdown {
    /// The calendar month as "YYYY-MM".
    pub month: String,
    /// The summed amount for the month.
    pub total: f64,
    /// Per-category totals, largest first.
    pub categories: Vec<CategoryBreakdown>,
}

/// Format a date's calendar month as "YYYY-MM".
pub(super) fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// Format a "YYYY-MM" key as e.g. "Mar 2024" for display.
///
/// Keys that do not look like a month are returned unchanged.
pub(super) fn month_display(key: &str) -> String {
    let Some((year, month_number)) = key.split_once('-') else {
        return key.to_owned();
    };

    let Ok(month_number) = month_number.parse::<u8>() else {
        return key.to_owned();
    };

    let Ok(month) = Month::try_from(month_number) else {
        return key.to_owned();
    };

    let name = match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{name} {year}")
}

/// The expenses whose date falls in the same calendar month as `today`.
pub(super) fn expenses_in_month<'a>(expenses: &'a [Expense], today: Date) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|expense| {
            expense.date.year() == today.year() && expense.date.month() == today.month()
        })
        .collect()
}

/// The expenses whose date falls in the same calendar year as `today`.
pub(super) fn expenses_in_year<'a>(expenses: &'a [Expense], today: Date) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|expense| expense.date.year() == today.year())
        .collect()
}

/// Sum the amounts of a set of expenses.
pub(super) fn total_amount(expenses: &[&Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Sum amounts per category, in first-encountered order.
fn category_totals_in_order(expenses: &[&Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        match totals
            .iter_mut()
            .find(|entry| entry.category == expense.category)
        {
            Some(entry) => entry.total += expense.amount,
            None => totals.push(CategoryTotal {
                category: expense.category,
                total: expense.amount,
            }),
        }
    }

    totals
}

/// Sum amounts per category, sorted largest total first.
pub(super) fn category_totals(expenses: &[&Expense]) -> Vec<CategoryTotal> {
    let mut totals = category_totals_in_order(expenses);
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// The category with the largest summed amount, or `None` when there are no
/// expenses.
///
/// Ties keep the category that was encountered first.
pub(super) fn top_category(expenses: &[&Expense]) -> Option<Category> {
    category_totals_in_order(expenses)
        .into_iter()
        .reduce(|best, entry| if entry.total > best.total { entry } else { best })
        .map(|entry| entry.category)
}

/// Total spending per calendar month, chronological ascending.
pub(super) fn monthly_trend(expenses: &[Expense]) -> Vec<MonthTotal> {
    let mut months: Vec<MonthTotal> = Vec::new();

    for expense in expenses {
        let key = month_key(expense.date);

        match months.iter_mut().find(|entry| entry.month == key) {
            Some(entry) => entry.total += expense.amount,
            None => months.push(MonthTotal {
                month: key,
                total: expense.amount,
            }),
        }
    }

    months.sort_by(|a, b| a.month.cmp(&b.month));
    months
}

/// Per-month, per-category totals and counts, most recent month first.
///
/// Categories within a month are sorted largest total first.
pub(super) fn monthly_breakdown(expenses: &[Expense]) -> Vec<MonthBreakdown> {
    let mut months: Vec<MonthBreakdown> = Vec::new();

    for expense in expenses {
        let key = month_key(expense.date);

        let month = match months.iter_mut().find(|entry| entry.month == key) {
            Some(month) => month,
            None => {
                months.push(MonthBreakdown {
                    month: key,
                    total: 0.0,
                    categories: Vec::new(),
                });
                months.last_mut().unwrap()
            }
        };

        month.total += expense.amount;

        match month
            .categories
            .iter_mut()
            .find(|entry| entry.category == expense.category)
        {
            Some(entry) => {
                entry.total += expense.amount;
                entry.count += 1;
            }
            None => month.categories.push(CategoryBreakdown {
                category: expense.category,
                total: expense.amount,
                count: 1,
            }),
        }
    }

    for month in &mut months {
        month
            .categories
            .sort_by(|a, b| b.total.total_cmp(&a.total));
    }

    months.sort_by(|a, b| b.month.cmp(&a.month));
    months
}

#[cfg(test)]
mod aggregation_tests {
    use time::{Date, macros::date};

    use crate::category::Category;
    use crate::insights::query::Expense;

    use super::{
        category_totals, expenses_in_month, expenses_in_year, month_display, month_key,
        monthly_breakdown, monthly_trend, top_category, total_amount,
    };

    fn expense(amount: f64, date: Date, category: Category) -> Expense {
        Expense {
            amount,
            date,
            category,
        }
    }

    #[test]
    fn month_key_pads_the_month() {
        assert_eq!(month_key(date!(2024 - 03 - 01)), "2024-03");
        assert_eq!(month_key(date!(2024 - 12 - 31)), "2024-12");
    }

    #[test]
    fn month_display_is_readable() {
        assert_eq!(month_display("2024-03"), "Mar 2024");
        assert_eq!(month_display("2024-12"), "Dec 2024");
        assert_eq!(month_display("garbage"), "garbage");
    }

    #[test]
    fn filters_by_calendar_month_not_window() {
        let expenses = vec![
            expense(100.0, date!(2024 - 03 - 01), Category::Food),
            expense(50.0, date!(2024 - 03 - 31), Category::Food),
            expense(25.0, date!(2024 - 02 - 29), Category::Food),
            expense(10.0, date!(2023 - 03 - 15), Category::Food),
        ];

        let this_month = expenses_in_month(&expenses, date!(2024 - 03 - 15));

        assert_eq!(total_amount(&this_month), 150.0);
    }

    #[test]
    fn filters_by_calendar_year() {
        let expenses = vec![
            expense(100.0, date!(2024 - 01 - 01), Category::Food),
            expense(50.0, date!(2024 - 12 - 31), Category::Travel),
            expense(25.0, date!(2023 - 12 - 31), Category::Food),
        ];

        let this_year = expenses_in_year(&expenses, date!(2024 - 06 - 15));

        assert_eq!(total_amount(&this_year), 150.0);
    }

    #[test]
    fn category_totals_sum_and_sort_descending() {
        let expenses = vec![
            expense(10.0, date!(2024 - 03 - 01), Category::Food),
            expense(100.0, date!(2024 - 03 - 02), Category::Travel),
            expense(15.0, date!(2024 - 03 - 03), Category::Food),
        ];
        let refs: Vec<&Expense> = expenses.iter().collect();

        let totals = category_totals(&refs);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, Category::Travel);
        assert_eq!(totals[0].total, 100.0);
        assert_eq!(totals[1].category, Category::Food);
        assert_eq!(totals[1].total, 25.0);
    }

    #[test]
    fn top_category_is_largest_sum() {
        let expenses = vec![
            expense(10.0, date!(2024 - 03 - 01), Category::Food),
            expense(100.0, date!(2024 - 03 - 02), Category::Travel),
            expense(95.0, date!(2024 - 03 - 03), Category::Food),
        ];
        let refs: Vec<&Expense> = expenses.iter().collect();

        assert_eq!(top_category(&refs), Some(Category::Food));
    }

    #[test]
    fn top_category_breaks_ties_by_first_encountered() {
        let expenses = vec![
            expense(50.0, date!(2024 - 03 - 01), Category::Shopping),
            expense(50.0, date!(2024 - 03 - 02), Category::Travel),
        ];
        let refs: Vec<&Expense> = expenses.iter().collect();

        assert_eq!(top_category(&refs), Some(Category::Shopping));
    }

    #[test]
    fn top_category_of_nothing_is_none() {
        assert_eq!(top_category(&[]), None);
    }

    #[test]
    fn trend_is_chronological_ascending() {
        let expenses = vec![
            expense(30.0, date!(2024 - 03 - 10), Category::Food),
            expense(10.0, date!(2024 - 01 - 10), Category::Food),
            expense(20.0, date!(2024 - 02 - 10), Category::Food),
            expense(5.0, date!(2024 - 01 - 20), Category::Travel),
        ];

        let trend = monthly_trend(&expenses);

        let months: Vec<&str> = trend.iter().map(|entry| entry.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(trend[0].total, 15.0);
        assert_eq!(trend[1].total, 20.0);
        assert_eq!(trend[2].total, 30.0);
    }

    #[test]
    fn breakdown_is_most_recent_first_with_counts() {
        let expenses = vec![
            expense(10.0, date!(2024 - 01 - 10), Category::Food),
            expense(20.0, date!(2024 - 01 - 15), Category::Food),
            expense(5.0, date!(2024 - 01 - 20), Category::Travel),
            expense(50.0, date!(2024 - 02 - 01), Category::Utilities),
        ];

        let breakdown = monthly_breakdown(&expenses);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].month, "2024-02");
        assert_eq!(breakdown[0].total, 50.0);

        let january = &breakdown[1];
        assert_eq!(january.month, "2024-01");
        assert_eq!(january.total, 35.0);
        assert_eq!(january.categories.len(), 2);
        assert_eq!(january.categories[0].category, Category::Food);
        assert_eq!(january.categories[0].total, 30.0);
        assert_eq!(january.categories[0].count, 2);
        assert_eq!(january.categories[1].count, 1);
    }

    #[test]
    fn aggregates_handle_no_data() {
        assert!(monthly_trend(&[]).is_empty());
        assert!(monthly_breakdown(&[]).is_empty());
        assert!(category_totals(&[]).is_empty());
    }
}
