//! The page listing all saved bills, with per-row delete.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, endpoints,
    bill::{Bill, BillId, delete_bill, get_all_bills},
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
};

/// The state needed to display and prune the bill history.
#[derive(Debug, Clone)]
pub struct HistoryState {
    /// The database connection for managing bills.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the bill history page.
pub async fn get_history_page(State(state): State<HistoryState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let bills = get_all_bills(&connection)
        .inspect_err(|error| tracing::error!("could not get bills: {error}"))?;

    let nav_bar = NavBar::new(endpoints::HISTORY_VIEW);

    if bills.is_empty() {
        return Ok(history_no_data_view(nav_bar).into_response());
    }

    Ok(history_view(nav_bar, &bills).into_response())
}

/// A route handler for deleting a bill from the history table.
///
/// The success response carries no row content, so HTMX swaps the table row
/// away, plus an out-of-band success alert. A missing bill responds with an
/// error alert instead, leaving the table unchanged.
pub async fn delete_bill_row_endpoint(
    State(state): State<HistoryState>,
    Path(bill_id): Path<BillId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_bill(bill_id, &connection) {
        // The status code has to be 200 OK or HTMX will not remove the table row.
        Ok(rows) if rows > 0 => {
            tracing::info!("deleted bill {bill_id}");

            let alert = Alert::success("Bill deleted", "").into_html();
            html!(
                div id="alert-container" hx-swap-oob="innerHTML" { (alert) }
            )
            .into_response()
        }
        Ok(_) => Error::DeleteMissingBill.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete bill {bill_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Renders the history page when no bills have been saved yet.
fn history_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_bill_link = link(endpoints::NEW_BILL_VIEW, "adding a bill");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Saved bills will show up here. Start by " (new_bill_link) "."
            }
        }
    );

    base("History", &[], &content)
}

/// Renders the history table with an export link above it.
fn history_view(nav_bar: NavBar, bills: &[Bill]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 py-8 mx-auto max-w-screen-lg text-gray-900 dark:text-white w-full"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h1 class="text-2xl font-bold" { "History" }

                (link(endpoints::EXPORT, "Export CSV"))
            }

            div class="relative overflow-x-auto shadow-md sm:rounded-lg"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Bill" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Vendor" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "" }
                        }
                    }

                    tbody
                    {
                        @for bill in bills {
                            (bill_row(bill))
                        }
                    }
                }
            }
        }
    );

    base("History", &[], &content)
}

/// Renders one history table row.
fn bill_row(bill: &Bill) -> Markup {
    let delete_endpoint = format_endpoint(endpoints::DELETE_BILL_ROW, bill.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                a href=(bill.image_path) target="_blank"
                {
                    img
                        src=(bill.image_path)
                        alt=(format!("Bill from {}", bill.vendor))
                        class="w-12 rounded border border-gray-300 dark:border-gray-600";
                }
            }

            td class=(TABLE_CELL_STYLE) { (bill.date) }

            td class=(TABLE_CELL_STYLE) { (bill.vendor) }

            td class=(TABLE_CELL_STYLE)
            {
                span
                    class="inline-flex items-center px-2.5 py-0.5 text-xs
                        font-semibold text-white rounded-full"
                    style=(format!("background-color: {}", bill.category.color()))
                {
                    (bill.category.label())
                }
            }

            td class=(TABLE_CELL_STYLE) { (format_currency(bill.amount)) }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_endpoint)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    hx-confirm=(format!("Delete the bill from {}?", bill.vendor))
                {
                    "Delete"
                }
            }
        }
    )
}

#[cfg(test)]
mod history_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::{Path, State},
        http::{Response, StatusCode},
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        bill::{BillDraft, create_bill, get_all_bills},
        category::Category,
        db::initialize,
    };

    use super::{HistoryState, delete_bill_row_endpoint, get_history_page};

    fn test_state() -> HistoryState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        HistoryState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn add_bill(state: &HistoryState, vendor: &str, amount: f64) -> i64 {
        let connection = state.db_connection.lock().unwrap();
        create_bill(
            BillDraft {
                vendor: vendor.to_owned(),
                category: Category::Food,
                date: "2024-03-01".to_owned(),
                amount,
                image_path: "/uploads/test.jpg".to_owned(),
            },
            &connection,
        )
        .unwrap()
        .id
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[tokio::test]
    async fn lists_saved_bills() {
        let state = test_state();
        add_bill(&state, "Cafe X", 250.0);
        add_bill(&state, "Power Co", 89.5);

        let response = get_history_page(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert!(html.errors.is_empty(), "invalid HTML: {:?}", html.errors);

        let rows = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&rows).count(), 2);

        let text = html.html();
        assert!(text.contains("Cafe X"));
        assert!(text.contains("$250.00"));
    }

    #[tokio::test]
    async fn shows_prompt_when_empty() {
        let state = test_state();

        let response = get_history_page(State(state)).await.unwrap();
        let html = parse_html(response).await;

        assert!(html.html().contains("Nothing here yet"));
    }

    #[tokio::test]
    async fn delete_responds_with_empty_row() {
        let state = test_state();
        let bill_id = add_bill(&state, "Cafe X", 250.0);

        let response = delete_bill_row_endpoint(State(state.clone()), Path(bill_id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_bills(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_of_missing_bill_responds_not_found() {
        let state = test_state();

        let response = delete_bill_row_endpoint(State(state), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
