//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    bill::{
        create_bill_endpoint, delete_bill_endpoint, delete_bill_row_endpoint, get_history_page,
        get_new_bill_page, list_bills_endpoint, save_bill_endpoint,
    },
    export::export_endpoint,
    insights::{get_dashboard_page, insights_endpoint},
    not_found::get_404_not_found,
    upload::{upload_endpoint, upload_review_endpoint},
};

/// Return a router with all the app's routes.
///
/// The JSON API and the HTML views share their core operations; the views
/// add HTMX-flavored wrappers that answer with partials instead of JSON.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(endpoints::UPLOAD_API, post(upload_endpoint))
        .route(
            endpoints::BILLS_API,
            post(create_bill_endpoint).get(list_bills_endpoint),
        )
        .route(endpoints::BILL_API, delete(delete_bill_endpoint))
        .route(endpoints::INSIGHTS_API, get(insights_endpoint));

    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::NEW_BILL_VIEW, get(get_new_bill_page))
        .route(endpoints::UPLOAD_FORM, post(upload_review_endpoint))
        .route(endpoints::SAVE_BILL_FORM, post(save_bill_endpoint))
        .route(endpoints::HISTORY_VIEW, get(get_history_page))
        .route(endpoints::DELETE_BILL_ROW, delete(delete_bill_row_endpoint))
        .route(endpoints::EXPORT, get(export_endpoint));

    api_routes
        .merge(view_routes)
        .nest_service(
            endpoints::UPLOADS,
            ServeDir::new(state.uploads_dir.clone()),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
