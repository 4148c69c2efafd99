//! The endpoint URIs for the JSON API and the HTML views.
//!
//! For endpoints that take a parameter, e.g., '/bills/{bill_id}', use
//! [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The spending dashboard with insight cards, charts and the monthly
/// breakdown table.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for uploading and reviewing a new bill.
pub const NEW_BILL_VIEW: &str = "/new";
/// The page listing all saved bills.
pub const HISTORY_VIEW: &str = "/history";
/// The CSV download of all saved bills.
pub const EXPORT: &str = "/export";
/// The route that serves uploaded bill images.
pub const UPLOADS: &str = "/uploads";

/// The HTMX route that uploads an image and swaps in the review form.
pub const UPLOAD_FORM: &str = "/new/upload";
/// The HTMX route that saves the reviewed bill.
pub const SAVE_BILL_FORM: &str = "/new/save";
/// The HTMX route that deletes a bill from the history table.
pub const DELETE_BILL_ROW: &str = "/history/{bill_id}";

/// The API route that uploads an image and returns the extracted fields.
pub const UPLOAD_API: &str = "/upload";
/// The API route to create and list bills.
pub const BILLS_API: &str = "/bills";
/// The API route to delete a single bill.
pub const BILL_API: &str = "/bills/{bill_id}";
/// The API route that returns the spending insight aggregates.
pub const INSIGHTS_API: &str = "/insights";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a brace-delimited name such as '{bill_id}' in
/// '/bills/{bill_id}'. Endpoint paths are assumed to contain at most one
/// parameter; a path without one is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map(|offset| start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..start],
        id,
        &endpoint_path[end..]
    )
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "invalid URI: {uri}");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_BILL_VIEW);
        assert_endpoint_is_valid_uri(endpoints::HISTORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EXPORT);
        assert_endpoint_is_valid_uri(endpoints::UPLOADS);

        assert_endpoint_is_valid_uri(endpoints::UPLOAD_FORM);
        assert_endpoint_is_valid_uri(endpoints::SAVE_BILL_FORM);
        assert_endpoint_is_valid_uri(endpoints::DELETE_BILL_ROW);

        assert_endpoint_is_valid_uri(endpoints::UPLOAD_API);
        assert_endpoint_is_valid_uri(endpoints::BILLS_API);
        assert_endpoint_is_valid_uri(endpoints::BILL_API);
        assert_endpoint_is_valid_uri(endpoints::INSIGHTS_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::BILL_API, 42);

        assert_eq!(formatted_path, "/bills/42");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint(endpoints::BILLS_API, 1);

        assert_eq!(formatted_path, endpoints::BILLS_API);
    }
}
