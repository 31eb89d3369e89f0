//! # Quill Core
//!
//! The domain layer of the Quill blog platform.
//! Entities, the content rules (slugs, publish validation, metrics) and the
//! services that enforce them over storage ports. No infrastructure
//! dependencies live here.

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod services;
pub mod slug;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use services::{AssociationManager, BlogServices, CategoryService, PostService};
pub use slug::slugify;
