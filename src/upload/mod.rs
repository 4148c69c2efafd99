//! The upload step: receiving a bill image, storing it, and running the
//! vision model over it.
//!
//! Uploading never saves a bill. The image is written to disk, the extractor
//! takes its best guess, and the guess goes back to the client for review.
//! The file stays on disk whether or not the user ever confirms the bill;
//! abandoned uploads are not cleaned up.

mod form_endpoint;
mod json_endpoint;
mod storage;

use axum::extract::{FromRef, Multipart};
use time::Date;

pub use form_endpoint::upload_review_endpoint;
pub use json_endpoint::upload_endpoint;
pub(crate) use storage::{media_type_for_extension, save_upload, validate_extension};

use crate::{
    AppState, Error,
    extraction::{ExtractedBillData, VisionExtractor},
    timezone::local_today,
};

/// The state needed to receive and extract an uploaded bill image.
#[derive(Debug, Clone)]
pub struct UploadState {
    /// The directory uploaded images are written to.
    pub uploads_dir: std::path::PathBuf,
    /// The vision model client, absent when no API key was configured.
    pub extractor: Option<VisionExtractor>,
    /// The timezone used to default the bill date to "today".
    pub local_timezone: String,
}

impl FromRef<AppState> for UploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            uploads_dir: state.uploads_dir.clone(),
            extractor: state.extractor.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The result of one upload: where the image landed plus the (possibly
/// defaulted) field guesses for the review step.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    /// The served path of the stored image, e.g. "/uploads/3f8a….jpg".
    pub image_path: String,
    /// The extracted fields; all defaults when extraction failed.
    pub data: ExtractedBillData,
    /// The bill date to show: the extracted date, or today when the model
    /// did not produce one.
    pub date: Date,
    /// Whether the model produced usable fields.
    pub extraction_success: bool,
    /// The reason extraction failed, for display next to the manual-entry
    /// fallback.
    pub error: Option<String>,
}

/// Receive a bill image from a multipart form, store it, and extract its
/// fields.
///
/// Extraction failure is not an error: the outcome then carries defaulted
/// fields, `extraction_success=false` and the failure reason. Only problems
/// with the upload itself (no file, unsupported type, the file not being
/// writable) surface as errors.
///
/// # Errors
/// Returns:
/// - [Error::MultipartError] when the form cannot be read,
/// - [Error::MissingFile] when no file field is present,
/// - [Error::UnsupportedFileType] when the extension is not an accepted
///   image type,
/// - [Error::FileSaveError] when the image cannot be written.
pub(crate) async fn process_upload(
    state: &UploadState,
    mut multipart: Multipart,
) -> Result<UploadOutcome, Error> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?;

        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload.ok_or(Error::MissingFile)?;
    let extension = validate_extension(&file_name)?;

    let image_path = save_upload(&bytes, &extension, &state.uploads_dir).await?;
    tracing::info!("stored upload {} ({} bytes)", image_path, bytes.len());

    let extraction = match &state.extractor {
        Some(extractor) => extractor
            .extract(&bytes, media_type_for_extension(&extension))
            .await
            .map_err(|error| {
                tracing::warn!("extraction failed for {image_path}: {error}");
                error.to_string()
            }),
        None => Err("No vision API key is configured.".to_owned()),
    };

    let (data, extraction_success, error) = match extraction {
        Ok(data) => (data, true, None),
        Err(reason) => (ExtractedBillData::default(), false, Some(reason)),
    };

    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let date = data.date.unwrap_or(today);

    Ok(UploadOutcome {
        image_path,
        data,
        date,
        extraction_success,
        error,
    })
}
