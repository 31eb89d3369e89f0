use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use quill_core::domain::{CategoryRef, NewPost, Post, PostChanges};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use super::{InMemoryStore, newest_first};

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.posts.remove(&id).is_some() {
            tables.replace_links(id, &[]);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(
        &self,
        published: Option<bool>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Post>, u64), RepoError> {
        let tables = self.store.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| published.is_none_or(|wanted| p.published == wanted))
            .collect();
        matching.sort_by(|a, b| newest_first(a, b));

        let total = matching.len() as u64;
        let window = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((window, total))
    }

    async fn categories_for(
        &self,
        post_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<CategoryRef>>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(post_ids
            .iter()
            .map(|&id| (id, tables.categories_of(id)))
            .collect())
    }

    async fn insert(&self, post: NewPost, category_ids: &[i32]) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_post_slug(&post.slug, None)?;
        tables.check_categories_exist(category_ids)?;

        let created = Post {
            id: tables.next_post_id(),
            title: post.title,
            content: post.content,
            slug: post.slug,
            image_url: post.image_url,
            published: post.published,
            created_at: post.created_at,
            updated_at: post.created_at,
        };
        tables.posts.insert(created.id, created.clone());
        tables.replace_links(created.id, category_ids);
        Ok(created)
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        if let Some(slug) = &changes.slug {
            tables.check_post_slug(slug, Some(id))?;
        }
        if let Some(category_ids) = &changes.category_ids {
            tables.check_categories_exist(category_ids)?;
        }

        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(slug) = changes.slug {
            post.slug = slug;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(image_url) = changes.image_url {
            post.image_url = image_url;
        }
        if let Some(published) = changes.published {
            post.published = published;
        }
        post.updated_at = changes.updated_at;
        let updated = post.clone();

        if let Some(category_ids) = changes.category_ids {
            tables.replace_links(id, &category_ids);
        }
        Ok(updated)
    }
}
