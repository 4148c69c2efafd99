//! The HTMX endpoint for saving the reviewed bill.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    bill::{BillDraft, create_bill},
    category::Category,
};

/// The state needed to save a reviewed bill.
#[derive(Debug, Clone)]
pub struct SaveBillState {
    /// The database connection for managing bills.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SaveBillState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data from the review step.
///
/// Numbers arrive as text so that a cleared field produces a validation
/// alert instead of a form rejection.
#[derive(Debug, Deserialize)]
pub struct SaveBillForm {
    /// Who the money was paid to.
    #[serde(default)]
    pub vendor: String,
    /// The chosen category name.
    #[serde(default)]
    pub category: String,
    /// The bill date, "YYYY-MM-DD" from the date input.
    #[serde(default)]
    pub date: String,
    /// The amount as typed.
    #[serde(default)]
    pub amount: String,
    /// The stored image path from the upload step.
    #[serde(default)]
    pub image_path: String,
}

/// A route handler for saving the reviewed bill, redirects to the history
/// view on success.
///
/// Validation failures respond with an error alert and leave the review form
/// in place so the user can correct the fields and try again.
pub async fn save_bill_endpoint(
    State(state): State<SaveBillState>,
    Form(form): Form<SaveBillForm>,
) -> Response {
    let draft = BillDraft {
        vendor: form.vendor,
        category: Category::from_name(&form.category),
        date: form.date,
        amount: form.amount.trim().parse().unwrap_or(0.0),
        image_path: form.image_path,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_bill(draft, &connection) {
        Ok(bill) => {
            tracing::info!("saved bill {} from {}", bill.id, bill.vendor);
            (
                HxRedirect(endpoints::HISTORY_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod save_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{bill::get_all_bills, db::initialize};

    use super::{SaveBillForm, SaveBillState, save_bill_endpoint};

    fn test_state() -> SaveBillState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        SaveBillState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn valid_form() -> SaveBillForm {
        SaveBillForm {
            vendor: "Cafe X".to_owned(),
            category: "food".to_owned(),
            date: "2024-03-01".to_owned(),
            amount: "250.00".to_owned(),
            image_path: "/uploads/test.jpg".to_owned(),
        }
    }

    #[tokio::test]
    async fn save_redirects_to_history() {
        let state = test_state();

        let response = save_bill_endpoint(State(state.clone()), Form(valid_form()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(location, "/history");

        let connection = state.db_connection.lock().unwrap();
        let bills = get_all_bills(&connection).unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].vendor, "Cafe X");
        assert_eq!(bills[0].amount, 250.0);
    }

    #[tokio::test]
    async fn save_rejects_zero_amount_with_alert() {
        let state = test_state();
        let mut form = valid_form();
        form.amount = "0".to_owned();

        let response = save_bill_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_bills(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_treats_unparseable_amount_as_invalid() {
        let state = test_state();
        let mut form = valid_form();
        form.amount = "lots".to_owned();

        let response = save_bill_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn save_rejects_blank_vendor() {
        let state = test_state();
        let mut form = valid_form();
        form.vendor = "  ".to_owned();

        let response = save_bill_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn save_accepts_unknown_category_as_other() {
        let state = test_state();
        let mut form = valid_form();
        form.category = "petrol".to_owned();

        let response = save_bill_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let bills = get_all_bills(&connection).unwrap();
        assert_eq!(bills[0].category, crate::Category::Other);
    }
}
