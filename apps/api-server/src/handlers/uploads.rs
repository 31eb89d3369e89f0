//! Image upload handler.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde::Serialize;

use quill_core::ports::{ImageUpload, MAX_IMAGE_BYTES};
use quill_shared::ApiResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const FILE_NAME_HEADER: &str = "x-file-name";

#[derive(Debug, Serialize)]
pub struct UploadedImage {
    pub url: String,
}

/// POST /api/uploads/images
///
/// The raw request body is the image; `Content-Type` names its MIME type.
pub async fn upload_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let store = state
        .images
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("Image uploads are not configured".into()))?;

    let content_type = header_value(&req, header::CONTENT_TYPE.as_str())
        .ok_or_else(|| AppError::UnsupportedMediaType("Content-Type header is required".into()))?;
    let file_name = header_value(&req, FILE_NAME_HEADER);

    // Read at most the image limit so an oversize body never lands in memory.
    let body = match payload.to_bytes_limited(MAX_IMAGE_BYTES).await {
        Ok(read) => read.map_err(|e| AppError::BadRequest(format!("Could not read upload: {e}")))?,
        Err(_) => {
            return Err(AppError::PayloadTooLarge(format!(
                "Image exceeds the {MAX_IMAGE_BYTES} byte limit"
            )));
        }
    };

    let size = body.len();
    let url = store
        .upload(ImageUpload {
            file_name,
            content_type,
            bytes: body.to_vec(),
        })
        .await?;

    tracing::debug!(size, "Upload request served");
    Ok(HttpResponse::Created().json(ApiResponse::ok(UploadedImage { url })))
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
