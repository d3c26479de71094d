//! Loading story photos from local files (the upload path of the
//! add-story form).

use std::path::Path;
use story_core::error::{Result, StoryError};
use story_core::story::Photo;

/// Largest photo the backend accepts.
pub const MAX_PHOTO_BYTES: usize = 1024 * 1024;

/// Reads an image file, guessing its MIME type from the extension.
///
/// Non-image files and files over [`MAX_PHOTO_BYTES`] are rejected.
pub async fn load_photo(path: &Path) -> Result<Photo> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(StoryError::resource(format!(
            "{} is not an image ({})",
            path.display(),
            mime
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(StoryError::resource(format!(
            "Photo is larger than {} KB",
            MAX_PHOTO_BYTES / 1024
        )));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    Ok(Photo {
        file_name,
        mime_type: mime.essence_str().to_string(),
        bytes,
    })
}
