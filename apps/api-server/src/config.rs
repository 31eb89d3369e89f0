//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quill_infra::DatabaseConfig;

/// Image host settings; uploads are disabled when `IMAGE_UPLOAD_URL` is unset.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub uploads: Option<UploadConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = non_empty("DATABASE_URL").map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
                min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
                ..defaults
            }
        });

        let uploads = non_empty("IMAGE_UPLOAD_URL").map(|endpoint| UploadConfig {
            endpoint,
            token: non_empty("IMAGE_UPLOAD_TOKEN"),
            timeout: Duration::from_secs(parsed("IMAGE_UPLOAD_TIMEOUT_SECS").unwrap_or(30)),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            uploads,
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
