use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Category, CategoryChanges, CategoryRef, CategoryWithCount, NewCategory, NewPost, Post,
    PostChanges,
};
use crate::error::RepoError;

/// Lookup and removal shared by every slugged entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Find an entity by its unique slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Deleting a missing ID is not an error.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Category storage.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i32> {
    /// All categories ordered by name, each with its association count.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;

    /// Posts linked to a category, newest first.
    async fn find_posts(&self, category_id: i32) -> Result<Vec<Post>, RepoError>;

    /// The subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RepoError>;

    async fn insert(&self, category: NewCategory) -> Result<Category, RepoError>;

    /// Apply changes; `RepoError::NotFound` when the row is gone.
    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, RepoError>;
}

/// Post storage, including the post side of the association table.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// A window of posts, newest first, plus the total matching count.
    async fn list(
        &self,
        published: Option<bool>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Post>, u64), RepoError>;

    /// Categories for many posts at once, keyed by post ID.
    async fn categories_for(
        &self,
        post_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<CategoryRef>>, RepoError>;

    /// Insert a post and link it to `category_ids` atomically.
    async fn insert(&self, post: NewPost, category_ids: &[i32]) -> Result<Post, RepoError>;

    /// Apply changes and, if present, replace the association set, atomically.
    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError>;
}

/// The storage handles a set of services is built from.
#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
}
