//! The HTMX endpoint that uploads a bill image and swaps in the review form.

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};

use super::{UploadState, process_upload};
use crate::bill::{ReviewFormData, review_form};

/// A route handler that stores the uploaded image, runs extraction, and
/// responds with the review form partial.
///
/// When extraction fails the partial still renders, with blank fields and a
/// warning, so the user can enter the details manually. Upload problems (no
/// file, unsupported type) respond with an error alert and leave the page in
/// its initial state.
pub async fn upload_review_endpoint(
    State(state): State<UploadState>,
    multipart: Multipart,
) -> Response {
    match process_upload(&state, multipart).await {
        Ok(outcome) => {
            let warning = (!outcome.extraction_success).then(|| {
                outcome
                    .error
                    .unwrap_or_else(|| "The image could not be read.".to_owned())
            });

            review_form(ReviewFormData {
                vendor: outcome.data.vendor_name.unwrap_or_default(),
                category: outcome.data.category,
                date: outcome.date,
                amount: outcome.data.total_amount,
                image_path: outcome.image_path,
                warning,
            })
            .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
