use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    CreatePost, NewPost, PageRequest, Pagination, Post, PostChanges, PostDetail, PostListFilter,
    PostPage, PostPatch, PostWithCategories, DEFAULT_RECENT_LIMIT,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, PostRepository};
use crate::services::AssociationManager;
use crate::validation;

const ENTITY: &str = "Post";
const DUPLICATE: &str = "A post with this title already exists";

/// Post use cases.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    associations: AssociationManager,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            posts,
            associations: AssociationManager::new(categories),
        }
    }

    /// One page of posts, newest first, each with its categories.
    pub async fn list(&self, filter: PostListFilter) -> Result<PostPage, DomainError> {
        let request = PageRequest::new(filter.page, filter.limit)?;
        let (posts, total) = self
            .posts
            .list(filter.published, request.offset(), request.limit)
            .await?;

        tracing::debug!(total, page = request.page, limit = request.limit, "Listed posts");

        Ok(PostPage {
            posts: self.with_categories(posts).await?,
            pagination: Pagination::new(total, request),
        })
    }

    /// Newest posts without pagination metadata.
    pub async fn recent(
        &self,
        published: Option<bool>,
        limit: Option<u64>,
    ) -> Result<Vec<PostWithCategories>, DomainError> {
        let request = PageRequest::with_default_limit(None, limit, DEFAULT_RECENT_LIMIT)?;
        let (posts, _) = self.posts.list(published, 0, request.limit).await?;
        self.with_categories(posts).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;
        self.detail(post).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, slug))?;
        self.detail(post).await
    }

    pub async fn create(&self, input: CreatePost) -> Result<PostDetail, DomainError> {
        validation::validate_post(&input.title, &input.content, input.published)?;
        if let Some(url) = &input.image_url {
            validation::validate_image_url(url)?;
        }

        let slug = validation::derive_slug("title", &input.title)?;
        self.ensure_slug_available(&slug, None).await?;
        let categories = self.associations.resolve(&input.category_ids).await?;

        let post = self
            .posts
            .insert(
                NewPost {
                    title: input.title,
                    content: input.content,
                    slug,
                    image_url: input.image_url,
                    published: input.published,
                    created_at: Utc::now(),
                },
                categories.ids(),
            )
            .await?;

        tracing::info!(
            post_id = post.id,
            slug = %post.slug,
            published = post.published,
            categories = categories.ids().len(),
            "Post created"
        );
        self.detail(post).await
    }

    /// Partial update. `updatedAt` is refreshed even when nothing else changes.
    pub async fn update(&self, id: i32, patch: PostPatch) -> Result<PostDetail, DomainError> {
        let current = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))?;

        let mut changes = PostChanges::touch(refreshed_at(current.created_at));

        if let Some(title) = patch.title {
            let slug = validation::derive_slug("title", &title)?;
            self.ensure_slug_available(&slug, Some(id)).await?;
            changes.title = Some(title);
            changes.slug = Some(slug);
        }
        if let Some(Some(url)) = &patch.image_url {
            validation::validate_image_url(url)?;
        }
        changes.content = patch.content;
        changes.image_url = patch.image_url;
        changes.published = patch.published;

        validation::validate_post(
            changes.title.as_deref().unwrap_or(&current.title),
            changes.content.as_deref().unwrap_or(&current.content),
            changes.published.unwrap_or(current.published),
        )?;

        if let Some(requested) = patch.category_ids {
            changes.category_ids = Some(self.associations.resolve(&requested).await?.into_vec());
        }

        let replaced_categories = changes.category_ids.is_some();
        let post = self.posts.update(id, changes).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(ENTITY, id),
            other => other.into(),
        })?;

        tracing::info!(
            post_id = id,
            slug = %post.slug,
            replaced_categories,
            "Post updated"
        );
        self.detail(post).await
    }

    /// Removes the post and its associations. Idempotent.
    pub async fn delete(&self, id: i32) -> Result<i32, DomainError> {
        self.posts.delete(id).await?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(id)
    }

    async fn ensure_slug_available(
        &self,
        slug: &str,
        owner: Option<i32>,
    ) -> Result<(), DomainError> {
        match self.posts.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(DomainError::Conflict(DUPLICATE.to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn detail(&self, post: Post) -> Result<PostDetail, DomainError> {
        let mut categories = self.posts.categories_for(&[post.id]).await?;
        let linked = categories.remove(&post.id).unwrap_or_default();
        Ok(PostDetail::new(post, linked))
    }

    async fn with_categories(
        &self,
        posts: Vec<Post>,
    ) -> Result<Vec<PostWithCategories>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        let mut categories = self.posts.categories_for(&ids).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let linked = categories.remove(&post.id).unwrap_or_default();
                PostWithCategories::new(post, linked)
            })
            .collect())
    }
}

/// `updatedAt` for an update call; never earlier than `createdAt`.
fn refreshed_at(created_at: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(created_at)
}
