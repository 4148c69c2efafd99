//! Database query for retrieving the bill data insights are computed from.
//!
//! This module provides a simplified bill view containing only the fields
//! the aggregations need (amount, date, category).

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::Date;

use crate::{Error, category::Category};

/// A simplified bill view for insight aggregations.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Expense {
    pub amount: f64,
    pub date: Date,
    pub category: Category,
}

/// Gets the amount, date and category of every bill within a date range, in
/// storage order.
///
/// Storage order matters: it is the "first encountered" order used to break
/// ties when picking the top category.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn get_expenses_in_date_range(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT amount, date, category
             FROM bill
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY id",
        )?
        .query_map((date_range.start(), date_range.end()), |row| {
            Ok(Expense {
                amount: row.get(0)?,
                date: row.get(1)?,
                category: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<Expense>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
