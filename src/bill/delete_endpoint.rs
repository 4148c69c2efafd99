//! The JSON endpoint for deleting a bill.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, bill::{BillId, delete_bill}};

/// The state needed to delete a bill.
#[derive(Debug, Clone)]
pub struct DeleteBillState {
    /// The database connection for managing bills.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBillState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that permanently deletes a bill by ID.
///
/// Deleting an ID that does not exist is an error, not a silent success:
/// the response is 404 with a `{detail}` body. The stored image file is
/// left behind.
pub async fn delete_bill_endpoint(
    State(state): State<DeleteBillState>,
    Path(bill_id): Path<BillId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_api_response();
        }
    };

    match delete_bill(bill_id, &connection) {
        Ok(0) => Error::DeleteMissingBill.into_api_response(),
        Ok(_) => {
            tracing::info!("deleted bill {bill_id}");
            Json(json!({ "message": "Bill deleted successfully" })).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete bill {bill_id}: {error}");
            error.into_api_response()
        }
    }
}
