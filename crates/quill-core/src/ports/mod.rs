//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod images;
mod repository;

pub use images::{
    ALLOWED_IMAGE_TYPES, ImageStore, ImageUpload, MAX_IMAGE_BYTES, UploadError,
    validate_image_upload,
};
pub use repository::{BaseRepository, CategoryRepository, PostRepository, Repositories};
