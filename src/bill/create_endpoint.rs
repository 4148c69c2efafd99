//! The JSON endpoint for saving a reviewed bill.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, bill::{BillDraft, create_bill}};

/// The state needed to create a bill.
#[derive(Debug, Clone)]
pub struct CreateBillState {
    /// The database connection for managing bills.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBillState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that validates a reviewed bill and stores it.
///
/// Responds with the full stored record, including the assigned ID, or with
/// a `{detail}` error body when the amount is not positive, the vendor is
/// blank, or the date cannot be parsed.
pub async fn create_bill_endpoint(
    State(state): State<CreateBillState>,
    Json(draft): Json<BillDraft>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_api_response();
        }
    };

    match create_bill(draft, &connection) {
        Ok(bill) => {
            tracing::info!("saved bill {} from {}", bill.id, bill.vendor);
            Json(bill).into_response()
        }
        Err(error) => error.into_api_response(),
    }
}
