//! Writing uploaded bill images to the uploads directory.

use std::path::Path;

use uuid::Uuid;

use crate::{Error, endpoints};

/// The image types the upload step accepts.
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Check an uploaded file's name against the extension allow-list.
///
/// Returns the lowercased extension.
///
/// # Errors
/// Returns [Error::UnsupportedFileType] for missing or unrecognised
/// extensions.
pub(crate) fn validate_extension(file_name: &str) -> Result<String, Error> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(Error::UnsupportedFileType(extension))
    }
}

/// The MIME type for an accepted extension.
///
/// Unknown extensions fall back to JPEG; by the time this is called the
/// extension has already passed [validate_extension].
pub(crate) fn media_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Write image bytes to the uploads directory under a fresh random name.
///
/// Returns the path the image is served from, e.g. "/uploads/3f8a….jpg".
/// The file is written unconditionally; nothing ever deletes it if the user
/// abandons the review step.
///
/// # Errors
/// Returns [Error::FileSaveError] when the directory cannot be created or
/// the file cannot be written.
pub(crate) async fn save_upload(
    bytes: &[u8],
    extension: &str,
    uploads_dir: &Path,
) -> Result<String, Error> {
    tokio::fs::create_dir_all(uploads_dir)
        .await
        .map_err(|error| Error::FileSaveError(error.to_string()))?;

    let file_name = format!("{}.{extension}", Uuid::new_v4());

    tokio::fs::write(uploads_dir.join(&file_name), bytes)
        .await
        .map_err(|error| Error::FileSaveError(error.to_string()))?;

    Ok(format!("{}/{file_name}", endpoints::UPLOADS))
}
