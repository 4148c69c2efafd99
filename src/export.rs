//! The CSV download of all saved bills.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    bill::{Bill, get_all_bills},
    timezone::local_today,
};

/// The state needed to export bills.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading bills.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to stamp the download filename with today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that downloads every saved bill as a CSV file.
///
/// The filename is stamped with the export date, e.g. "bills-2025-03-01.csv".
pub async fn export_endpoint(State(state): State<ExportState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let bills = match get_all_bills(&connection) {
        Ok(bills) => bills,
        Err(error) => return error.into_response(),
    };

    let csv = match build_csv(&bills) {
        Ok(csv) => csv,
        Err(error) => return error.into_response(),
    };

    let today = local_today(&state.local_timezone).unwrap_or_else(|| {
        tracing::warn!("invalid timezone {}, stamping export with UTC", state.local_timezone);
        time::OffsetDateTime::now_utc().date()
    });

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"bills-{today}.csv\""),
            ),
        ],
        csv,
    )
        .into_response()
}

/// Render bills as CSV: a header row then one row per bill, amounts with
/// exactly two decimal places. Quoting follows CSV rules (fields containing
/// commas or quotes are double-quoted, internal quotes doubled).
fn build_csv(bills: &[Bill]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Date", "Vendor", "Category", "Amount"])
        .and_then(|_| {
            bills.iter().try_for_each(|bill| {
                writer.write_record([
                    bill.date.to_string(),
                    bill.vendor.clone(),
                    bill.category.to_string(),
                    format!("{:.2}", bill.amount),
                ])
            })
        })
        .map_err(|error| {
            tracing::error!("could not write CSV: {error}");
            Error::FileSaveError(error.to_string())
        })?;

    let bytes = writer.into_inner().map_err(|error| {
        tracing::error!("could not flush CSV: {error}");
        Error::FileSaveError(error.to_string())
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
