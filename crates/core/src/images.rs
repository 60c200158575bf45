//! Fabric image upload checks and object-key naming.

use image::ImageFormat;

use crate::error::CoreError;

/// Object-store bucket holding fabric photos.
pub const FABRIC_IMAGES_BUCKET: &str = "fabric-images";

/// Accepted upload extensions.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Validate an uploaded image by extension and by sniffing its header.
///
/// Returns the normalized (lowercase) extension on success. The sniffed
/// format must agree with the extension so a renamed file is rejected.
pub fn validate_image_upload(filename: &str, bytes: &[u8]) -> Result<String, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::validation("Uploaded image is empty"));
    }

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported image format '.{ext}'. Supported: {ALLOWED_IMAGE_EXTENSIONS:?}"
        )));
    }

    let sniffed = image::guess_format(bytes)
        .map_err(|_| CoreError::validation("Uploaded file is not a recognizable image"))?;
    let expected = ImageFormat::from_extension(&ext);
    if expected != Some(sniffed) {
        return Err(CoreError::Validation(format!(
            "File content ({sniffed:?}) does not match its '.{ext}' extension"
        )));
    }
    Ok(ext)
}

/// Random object key for a stored image, keeping the extension.
pub fn image_object_key(ext: &str) -> String {
    format!("{}.{ext}", uuid::Uuid::new_v4())
}

/// MIME type for an accepted extension.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
