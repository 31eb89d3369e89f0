//! SeaORM entities for the `posts`, `categories` and `posts_to_categories` tables.

pub mod category;
pub mod post;
pub mod post_category;
