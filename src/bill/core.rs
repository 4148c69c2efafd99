//! Defines the core data model and database queries for bills.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{Error, category::Category};

/// Alias for the integer type used for bill row IDs.
pub type BillId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A saved bill: one expense backed by an uploaded image.
///
/// Bills are created once from a reviewed [BillDraft] and never edited in
/// place; corrections are made by deleting and re-entering the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// The ID of the bill, assigned by the database on insert.
    pub id: BillId,
    /// Who the money was paid to.
    pub vendor: String,
    /// The spending category the bill belongs to.
    pub category: Category,
    /// The date printed on the bill, not the date it was entered.
    pub date: Date,
    /// How much was paid. Always positive.
    pub amount: f64,
    /// Where the uploaded bill image is served from, e.g.
    /// "/uploads/3f8a….jpg". Carried through from the upload step and never
    /// re-checked against the filesystem.
    pub image_path: String,
    /// When the row was inserted, as recorded by SQLite. Returned for API
    /// parity and never interpreted by the application.
    pub created_at: String,
}

/// The user-confirmed fields of a bill, as posted to the save operation.
///
/// All fields default so that an incomplete payload produces a field-level
/// validation message rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BillDraft {
    /// Who the money was paid to. Must not be blank.
    #[serde(default)]
    pub vendor: String,
    /// The spending category. Unknown names become [Category::Other].
    #[serde(default)]
    pub category: Category,
    /// The date on the bill in ISO format, e.g. "2025-03-01".
    #[serde(default)]
    pub date: String,
    /// How much was paid. Must be greater than zero.
    #[serde(default)]
    pub amount: f64,
    /// The stored image path returned by the upload step.
    #[serde(default)]
    pub image_path: String,
}

impl BillDraft {
    /// Check the draft against the save rules and parse its date.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::NonPositiveAmount] when the amount is zero or negative,
    /// - [Error::EmptyVendor] when the vendor is blank,
    /// - [Error::InvalidDateFormat] when the date cannot be parsed.
    fn validate(&self) -> Result<Date, Error> {
        if self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        if self.vendor.trim().is_empty() {
            return Err(Error::EmptyVendor);
        }

        parse_bill_date(&self.date)
    }
}

/// Parse a date string in ISO "YYYY-MM-DD" format.
///
/// # Errors
/// Returns [Error::InvalidDateFormat] with the offending string.
pub(crate) fn parse_bill_date(date: &str) -> Result<Date, Error> {
    Date::parse(date, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDateFormat(date.to_owned()))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Validate a reviewed bill and insert it into the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::EmptyVendor] if the vendor is blank,
/// - or [Error::InvalidDateFormat] if the date cannot be parsed,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_bill(draft: BillDraft, connection: &Connection) -> Result<Bill, Error> {
    let date = draft.validate()?;

    let bill = connection
        .prepare(
            "INSERT INTO bill (vendor, category, date, amount, image_path)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, vendor, category, date, amount, image_path, created_at",
        )?
        .query_row(
            (
                draft.vendor.trim(),
                draft.category,
                date,
                draft.amount,
                draft.image_path,
            ),
            map_bill_row,
        )?;

    Ok(bill)
}

/// Retrieve all bills, most recent date first.
///
/// Bills sharing a date are returned newest insert first so the ordering is
/// stable.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_bills(connection: &Connection) -> Result<Vec<Bill>, Error> {
    connection
        .prepare(
            "SELECT id, vendor, category, date, amount, image_path, created_at
             FROM bill
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_bill_row)?
        .collect::<Result<Vec<Bill>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Delete a bill by its `id`, returning the number of rows removed.
///
/// A result of zero means there was no bill with that ID; callers decide
/// whether that is an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_bill(id: BillId, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM bill WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Get the total number of bills in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_bills(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM bill;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the bill table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_bill_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS bill (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                vendor TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                image_path TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
        (),
    )?;

    // Insights and the history page both scan by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_bill_date ON bill(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Bill.
pub(crate) fn map_bill_row(row: &Row) -> Result<Bill, rusqlite::Error> {
    Ok(Bill {
        id: row.get(0)?,
        vendor: row.get(1)?,
        category: row.get(2)?,
        date: row.get(3)?,
        amount: row.get(4)?,
        image_path: row.get(5)?,
        created_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        db::initialize,
        bill::{BillDraft, count_bills, create_bill, delete_bill, get_all_bills},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn draft(vendor: &str, amount: f64, date: &str) -> BillDraft {
        BillDraft {
            vendor: vendor.to_owned(),
            category: Category::Food,
            date: date.to_owned(),
            amount,
            image_path: "/uploads/test.jpg".to_owned(),
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let bill = create_bill(draft("Cafe X", 250.0, "2024-03-01"), &conn).unwrap();

        assert_eq!(bill.vendor, "Cafe X");
        assert_eq!(bill.category, Category::Food);
        assert_eq!(bill.date, date!(2024 - 03 - 01));
        assert_eq!(bill.amount, 250.0);
        assert_eq!(bill.image_path, "/uploads/test.jpg");
    }

    #[test]
    fn create_assigns_unique_ids() {
        let conn = get_test_connection();

        let first = create_bill(draft("A", 1.0, "2024-01-01"), &conn).unwrap();
        let second = create_bill(draft("B", 2.0, "2024-01-01"), &conn).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_rejects_zero_amount() {
        let conn = get_test_connection();

        let result = create_bill(draft("Cafe X", 0.0, "2024-03-01"), &conn);

        assert_eq!(result, Err(Error::NonPositiveAmount));
        assert_eq!(count_bills(&conn).unwrap(), 0);
    }

    #[test]
    fn create_rejects_negative_amount() {
        let conn = get_test_connection();

        let result = create_bill(draft("Cafe X", -9.99, "2024-03-01"), &conn);

        assert_eq!(result, Err(Error::NonPositiveAmount));
        assert_eq!(count_bills(&conn).unwrap(), 0);
    }

    #[test]
    fn create_rejects_blank_vendor() {
        let conn = get_test_connection();

        let result = create_bill(draft("   ", 10.0, "2024-03-01"), &conn);

        assert_eq!(result, Err(Error::EmptyVendor));
        assert_eq!(count_bills(&conn).unwrap(), 0);
    }

    #[test]
    fn create_rejects_malformed_date() {
        let conn = get_test_connection();

        let result = create_bill(draft("Cafe X", 10.0, "01/03/2024"), &conn);

        assert_eq!(
            result,
            Err(Error::InvalidDateFormat("01/03/2024".to_owned()))
        );
    }

    #[test]
    fn list_orders_by_date_descending() {
        let conn = get_test_connection();
        create_bill(draft("Old", 1.0, "2024-01-15"), &conn).unwrap();
        create_bill(draft("New", 2.0, "2024-03-15"), &conn).unwrap();
        create_bill(draft("Middle", 3.0, "2024-02-15"), &conn).unwrap();

        let bills = get_all_bills(&conn).unwrap();

        let vendors: Vec<&str> = bills.iter().map(|bill| bill.vendor.as_str()).collect();
        assert_eq!(vendors, vec!["New", "Middle", "Old"]);
    }

    #[test]
    fn list_includes_created_bill() {
        let conn = get_test_connection();

        let created = create_bill(draft("Cafe X", 250.0, "2024-03-01"), &conn).unwrap();
        let bills = get_all_bills(&conn).unwrap();

        assert_eq!(bills, vec![created]);
    }

    #[test]
    fn delete_removes_bill() {
        let conn = get_test_connection();
        let bill = create_bill(draft("Cafe X", 250.0, "2024-03-01"), &conn).unwrap();

        let rows_affected = delete_bill(bill.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert!(get_all_bills(&conn).unwrap().is_empty());
    }

    #[test]
    fn delete_of_missing_bill_affects_no_rows() {
        let conn = get_test_connection();

        let rows_affected = delete_bill(42, &conn).unwrap();

        assert_eq!(rows_affected, 0);
    }

    #[test]
    fn double_delete_affects_no_rows_second_time() {
        let conn = get_test_connection();
        let bill = create_bill(draft("Cafe X", 250.0, "2024-03-01"), &conn).unwrap();

        assert_eq!(delete_bill(bill.id, &conn).unwrap(), 1);
        assert_eq!(delete_bill(bill.id, &conn).unwrap(), 0);
    }
}
