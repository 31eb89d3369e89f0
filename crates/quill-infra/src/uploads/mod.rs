//! Image hosting clients.

#[cfg(feature = "uploads")]
mod http;

#[cfg(feature = "uploads")]
pub use http::{HttpImageStore, HttpImageStoreConfig};
