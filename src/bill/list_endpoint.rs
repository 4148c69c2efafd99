//! The JSON endpoint for listing all saved bills.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, bill::get_all_bills};

/// The state needed to list bills.
#[derive(Debug, Clone)]
pub struct ListBillsState {
    /// The database connection for managing bills.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListBillsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns every saved bill, most recent date first.
pub async fn list_bills_endpoint(State(state): State<ListBillsState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_api_response();
        }
    };

    match get_all_bills(&connection) {
        Ok(bills) => Json(bills).into_response(),
        Err(error) => error.into_api_response(),
    }
}

#[cfg(test)]
mod list_endpoint_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{AppState, build_router, endpoints};

    fn test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            std::env::temp_dir(),
            "Etc/UTC",
            None,
        )
        .unwrap();

        TestServer::new(build_router(state))
    }

    async fn create_bill(server: &TestServer, vendor: &str, date: &str) {
        server
            .post(endpoints::BILLS_API)
            .json(&json!({
                "vendor": vendor,
                "category": "other",
                "date": date,
                "amount": 10.0,
                "image_path": ""
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn list_is_empty_for_fresh_database() {
        let server = test_server();

        let bills: Vec<serde_json::Value> = server.get(endpoints::BILLS_API).await.json();

        assert!(bills.is_empty());
    }

    #[tokio::test]
    async fn list_orders_most_recent_date_first() {
        let server = test_server();
        create_bill(&server, "Oldest", "2024-01-01").await;
        create_bill(&server, "Newest", "2024-06-01").await;
        create_bill(&server, "Middle", "2024-03-01").await;

        let bills: Vec<serde_json::Value> = server.get(endpoints::BILLS_API).await.json();

        let vendors: Vec<&str> = bills
            .iter()
            .map(|bill| bill["vendor"].as_str().unwrap())
            .collect();
        assert_eq!(vendors, vec!["Newest", "Middle", "Oldest"]);
    }
}
