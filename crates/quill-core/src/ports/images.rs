//! Image hosting port - "upload a file, receive a durable URL".

use async_trait::async_trait;

/// Largest accepted upload, 2 MiB.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A file submitted for hosting.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Image hosting backend.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image and return its public HTTPS URL.
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError>;
}

/// Upload failures, each distinguishable for user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Image is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image is empty")]
    Empty,

    #[error("Could not reach the image host: {0}")]
    Network(String),

    #[error("Image host returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Image host returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Size and type checks applied before anything leaves the process.
pub fn validate_image_upload(image: &ImageUpload) -> Result<(), UploadError> {
    if image.bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge {
            size: image.bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }
    let mime = image
        .content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(UploadError::UnsupportedType(image.content_type.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: None,
            content_type: content_type.to_string(),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn test_accepts_supported_types_within_limit() {
        assert!(validate_image_upload(&upload("image/png", 1024)).is_ok());
        assert!(validate_image_upload(&upload("image/jpeg", MAX_IMAGE_BYTES)).is_ok());
        assert!(validate_image_upload(&upload("IMAGE/WEBP; q=1", 10)).is_ok());
    }

    #[test]
    fn test_rejects_oversize() {
        assert!(matches!(
            validate_image_upload(&upload("image/png", MAX_IMAGE_BYTES + 1)),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_type() {
        assert!(matches!(
            validate_image_upload(&upload("application/pdf", 10)),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            validate_image_upload(&upload("image/png", 0)),
            Err(UploadError::Empty)
        ));
    }
}
