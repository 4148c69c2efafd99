//! The JSON endpoint for the spending insight aggregates.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::Error;

use super::core::{InsightsState, build_insights};

/// A route handler that computes and returns the insight aggregates as of
/// today.
pub async fn insights_endpoint(State(state): State<InsightsState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_api_response();
        }
    };

    match build_insights(&connection, &state.local_timezone) {
        Ok(insights) => Json(insights).into_response(),
        Err(error) => error.into_api_response(),
    }
}

#[cfg(test)]
mod insights_endpoint_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;
    use time::OffsetDateTime;

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

    async fn create_bill(server: &TestServer, category: &str, date: &str, amount: f64) {
        server
            .post(endpoints::BILLS_API)
            .json(&json!({
                "vendor": "Vendor",
                "category": category,
                "date": date,
                "amount": amount,
                "image_path": ""
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn empty_database_yields_zeroed_insights() {
        let server = test_server();

        let body: serde_json::Value = server.get(endpoints::INSIGHTS_API).await.json();

        assert_eq!(body["total_this_month"], 0.0);
        assert_eq!(body["total_this_year"], 0.0);
        assert_eq!(body["top_category_this_month"], serde_json::Value::Null);
        assert_eq!(body["monthly_trend"], json!([]));
        assert_eq!(body["monthly_breakdown"], json!([]));
    }

    #[tokio::test]
    async fn sums_bills_dated_this_month() {
        let server = test_server();
        let today = OffsetDateTime::now_utc().date();
        create_bill(&server, "food", &today.to_string(), 250.0).await;
        create_bill(&server, "food", &today.to_string(), 50.0).await;

        let body: serde_json::Value = server.get(endpoints::INSIGHTS_API).await.json();

        assert_eq!(body["total_this_month"], 300.0);
        assert_eq!(body["top_category_this_month"], "food");
        assert_eq!(body["spending_by_category"][0]["category"], "food");
        assert_eq!(body["spending_by_category"][0]["total"], 300.0);

        let month_key = format!("{:04}-{:02}", today.year(), u8::from(today.month()));
        assert_eq!(body["monthly_trend"][0]["month"], month_key);
        assert_eq!(body["monthly_breakdown"][0]["month"], month_key);
        assert_eq!(body["monthly_breakdown"][0]["categories"][0]["count"], 2);
    }
}
