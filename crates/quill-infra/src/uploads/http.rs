//! HTTP image host client.
//!
//! Posts the file as `multipart/form-data` (field `file`) to the configured
//! endpoint and expects `{"url": "https://..."}` back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use uuid::Uuid;

use quill_core::ports::{ImageStore, ImageUpload, UploadError, validate_image_upload};

/// Configuration for the image host.
#[derive(Debug, Clone)]
pub struct HttpImageStoreConfig {
    pub endpoint: String,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// `ImageStore` backed by an HTTP upload endpoint.
pub struct HttpImageStore {
    client: reqwest::Client,
    config: HttpImageStoreConfig,
}

impl HttpImageStore {
    pub fn new(config: HttpImageStoreConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, UploadError> {
        validate_image_upload(&image)?;

        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| format!("{}.{}", Uuid::new_v4(), image.extension()));
        let size = image.bytes.len();

        let part = Part::bytes(image.bytes)
            .file_name(file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|_| UploadError::UnsupportedType(image.content_type.clone()))?;

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .multipart(Form::new().part("file", part));
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(file_name = %file_name, size, "Uploading image");

        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Image host rejected upload");
            return Err(UploadError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        if !body.url.starts_with("https://") {
            return Err(UploadError::InvalidResponse(format!(
                "expected an https URL, got '{}'",
                body.url
            )));
        }

        tracing::info!(url = %body.url, "Image uploaded");
        Ok(body.url)
    }
}
