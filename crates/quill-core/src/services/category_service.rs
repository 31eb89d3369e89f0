use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Category, CategoryChanges, CategoryPatch, CategoryWithCount, CategoryWithPosts,
    CreateCategory, NewCategory,
};
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;
use crate::validation;

const ENTITY: &str = "Category";
const DUPLICATE: &str = "A category with this name already exists";

/// Category use cases.
#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<CategoryWithCount>, DomainError> {
        Ok(self.repo.list_with_counts().await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Category, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryWithPosts, DomainError> {
        let category = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, slug))?;
        let posts = self.repo.find_posts(category.id).await?;

        Ok(CategoryWithPosts { category, posts })
    }

    pub async fn create(&self, input: CreateCategory) -> Result<Category, DomainError> {
        validation::require_non_empty("name", &input.name)?;
        let slug = validation::derive_slug("name", &input.name)?;

        if self.repo.find_by_slug(&slug).await?.is_some() {
            return Err(DomainError::Conflict(DUPLICATE.to_string()));
        }

        let category = self
            .repo
            .insert(NewCategory {
                name: input.name,
                description: input.description,
                slug,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Applies the provided fields. A rename re-derives the slug, which may
    /// equal the category's own current slug but no other category's.
    pub async fn update(&self, id: i32, patch: CategoryPatch) -> Result<Category, DomainError> {
        let current = self.get_by_id(id).await?;
        let mut changes = CategoryChanges {
            description: patch.description,
            ..Default::default()
        };

        if let Some(name) = patch.name {
            validation::require_non_empty("name", &name)?;
            let slug = validation::derive_slug("name", &name)?;

            if let Some(owner) = self.repo.find_by_slug(&slug).await? {
                if owner.id != id {
                    return Err(DomainError::Conflict(DUPLICATE.to_string()));
                }
            }

            changes.name = Some(name);
            changes.slug = Some(slug);
        }

        if changes.is_empty() {
            return Ok(current);
        }

        let category = self.repo.update(id, changes).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found(ENTITY, id),
            other => other.into(),
        })?;

        tracing::info!(category_id = id, slug = %category.slug, "Category updated");
        Ok(category)
    }

    /// Removes the category and its associations. Idempotent.
    pub async fn delete(&self, id: i32) -> Result<i32, DomainError> {
        self.repo.delete(id).await?;
        tracing::info!(category_id = id, "Category deleted");
        Ok(id)
    }
}
