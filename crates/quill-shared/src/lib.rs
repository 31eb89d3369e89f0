//! # Quill Shared
//!
//! Wire types for the HTTP API: request bodies, query strings and the
//! response envelopes. Kept free of domain logic so a client can depend on it.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, DeleteResponse, ErrorResponse};
