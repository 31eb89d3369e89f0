//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::BlogServices;
use quill_core::ports::{ImageStore, Repositories};
use quill_infra::InMemoryStore;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConnections;

#[cfg(feature = "uploads")]
use quill_infra::{HttpImageStore, HttpImageStoreConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: BlogServices,
    /// `None` when no image host is configured.
    pub images: Option<Arc<dyn ImageStore>>,
    /// Storage backend name reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (repos, storage) = Self::repositories(config).await;

        let state = Self {
            services: BlogServices::new(repos),
            images: Self::image_store(config),
            storage,
        };

        tracing::info!(
            storage = state.storage,
            uploads = state.images.is_some(),
            "Application state initialized"
        );
        state
    }

    /// State over a fresh in-memory store, with no image host.
    pub fn in_memory() -> Self {
        Self {
            services: BlogServices::new(Arc::new(InMemoryStore::new()).repositories()),
            images: None,
            storage: "memory",
        }
    }

    #[cfg(test)]
    pub fn with_images(mut self, images: Arc<dyn ImageStore>) -> Self {
        self.images = Some(images);
        self
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> (Repositories, &'static str) {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (Arc::new(InMemoryStore::new()).repositories(), "memory");
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => (connections.repositories(), "postgres"),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (Arc::new(InMemoryStore::new()).repositories(), "memory")
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(config: &AppConfig) -> (Repositories, &'static str) {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repository");
        (Arc::new(InMemoryStore::new()).repositories(), "memory")
    }

    #[cfg(feature = "uploads")]
    fn image_store(config: &AppConfig) -> Option<Arc<dyn ImageStore>> {
        let uploads = config.uploads.as_ref()?;
        let store = HttpImageStore::new(HttpImageStoreConfig {
            endpoint: uploads.endpoint.clone(),
            token: uploads.token.clone(),
            timeout: uploads.timeout,
        });

        match store {
            Ok(store) => {
                tracing::info!(endpoint = %uploads.endpoint, "Image uploads enabled");
                Some(Arc::new(store))
            }
            Err(e) => {
                tracing::error!("Failed to build image upload client: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "uploads"))]
    fn image_store(config: &AppConfig) -> Option<Arc<dyn ImageStore>> {
        if config.uploads.is_some() {
            tracing::warn!("IMAGE_UPLOAD_URL ignored: built without the uploads feature");
        }
        None
    }
}
