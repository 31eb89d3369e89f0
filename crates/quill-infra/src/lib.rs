//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory store only, no external dependencies
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `uploads` - HTTP image host client via reqwest

pub mod database;
pub mod memory;
pub mod uploads;

pub use database::DatabaseConfig;
pub use memory::{InMemoryCategoryRepository, InMemoryPostRepository, InMemoryStore};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "uploads")]
pub use uploads::{HttpImageStore, HttpImageStoreConfig};
