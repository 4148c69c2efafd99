//! The JSON endpoint for uploading a bill image.

use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::Date;

use super::{UploadState, process_upload};
use crate::category::Category;

/// The upload response: the stored image path plus the extracted (or
/// defaulted) field guesses for the client's review step.
#[derive(Debug, Serialize)]
pub struct ExtractionResponse {
    /// The served path of the stored image.
    pub image_path: String,
    /// The extracted vendor name, `null` when the model found none.
    pub vendor_name: Option<String>,
    /// The extracted category, "other" when the model found none.
    pub category: Category,
    /// The extracted bill date, or today when the model found none.
    pub date: Date,
    /// The extracted total, `null` when the model found none.
    pub total_amount: Option<f64>,
    /// Whether the model produced usable fields.
    pub extraction_success: bool,
    /// The reason extraction failed, `null` on success.
    pub error: Option<String>,
}

/// A route handler that stores an uploaded bill image and returns the
/// extracted fields.
///
/// Nothing is saved to the database; the client reviews the guesses and
/// saves the bill separately. Extraction failure still responds 200 with
/// `extraction_success=false` so the client can fall back to manual entry;
/// only a missing file, an unsupported type or a failed write produce an
/// error response.
pub async fn upload_endpoint(
    State(state): State<UploadState>,
    multipart: Multipart,
) -> Response {
    match process_upload(&state, multipart).await {
        Ok(outcome) => Json(ExtractionResponse {
            image_path: outcome.image_path,
            vendor_name: outcome.data.vendor_name,
            category: outcome.data.category,
            date: outcome.date,
            total_amount: outcome.data.total_amount,
            extraction_success: outcome.extraction_success,
            error: outcome.error,
        })
        .into_response(),
        Err(error) => error.into_api_response(),
    }
}
