//! Billfold is a web app for tracking personal expenses from photos of bills.
//!
//! A bill image is uploaded, read by an external vision model, reviewed and
//! corrected by the user, and saved for display in a history table and a
//! spending dashboard. The library exposes a JSON API alongside HTML pages
//! that are rendered directly by the server.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod alert;
mod app_state;
mod bill;
mod category;
mod db;
mod endpoints;
mod export;
mod extraction;
mod html;
mod insights;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod upload;

pub use app_state::AppState;
pub use category::Category;
pub use db::initialize as initialize_db;
pub use extraction::VisionExtractor;
pub use routing::build_router;

use crate::{alert::Alert, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A bill was submitted with an amount of zero or less.
    ///
    /// Bills record money that was spent, so the amount must be positive.
    #[error("Amount must be a positive number")]
    NonPositiveAmount,

    /// A bill was submitted without a vendor name.
    #[error("Vendor cannot be empty")]
    EmptyVendor,

    /// A date string could not be parsed as a calendar date.
    ///
    /// Dates are expected in ISO format, e.g. "2025-03-01".
    #[error("\"{0}\" is not a valid date in YYYY-MM-DD format")]
    InvalidDateFormat(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The upload form did not contain a file field.
    #[error("No file was uploaded")]
    MissingFile,

    /// The uploaded file's extension is not an accepted image type.
    #[error("Invalid file type \"{0}\". Allowed: jpg, jpeg, png, gif, webp")]
    UnsupportedFileType(String),

    /// The uploaded image could not be written to the uploads directory.
    ///
    /// The inner string is the I/O error, which should only be logged on the
    /// server.
    #[error("Failed to save file: {0}")]
    FileSaveError(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a bill that does not exist.
    #[error("Bill not found")]
    DeleteMissingBill,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code the error maps to on the JSON API.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NonPositiveAmount | Error::EmptyVendor | Error::InvalidDateFormat(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::MultipartError(_) | Error::MissingFile | Error::UnsupportedFileType(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound | Error::DeleteMissingBill => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error for the JSON API as `{"detail": "..."}`.
    ///
    /// Internal errors are logged and replaced with a generic message so that
    /// implementation details are not leaked to the client.
    pub(crate) fn into_api_response(self) -> Response {
        let status = self.status_code();

        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }

    /// Render the error as an HTML alert partial for HTMX view endpoints.
    pub(crate) fn into_alert_response(self) -> Response {
        let status = self.status_code();

        match self {
            Error::NonPositiveAmount => Alert::error(
                "Invalid amount",
                "The amount must be a positive number. Check the amount and try again.",
            )
            .into_response_with_status(status),
            Error::EmptyVendor => Alert::error(
                "Missing vendor",
                "Enter the name of the vendor before saving the bill.",
            )
            .into_response_with_status(status),
            Error::InvalidDateFormat(date) => Alert::error(
                "Invalid date",
                &format!("\"{date}\" could not be read as a date. Use the format YYYY-MM-DD."),
            )
            .into_response_with_status(status),
            Error::MissingFile => {
                Alert::error("No file selected", "Choose a bill image to upload first.")
                    .into_response_with_status(status)
            }
            Error::UnsupportedFileType(extension) => Alert::error(
                "Unsupported file type",
                &format!(
                    "\"{extension}\" files cannot be read. \
                    Upload a jpg, jpeg, png, gif or webp image."
                ),
            )
            .into_response_with_status(status),
            Error::DeleteMissingBill => Alert::error(
                "Could not delete bill",
                "The bill could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            )
            .into_response_with_status(status),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            error => error.into_alert_response(),
        }
    }
}
