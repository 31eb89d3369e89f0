use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use quill_core::domain::{Category, CategoryChanges, CategoryWithCount, NewCategory, Post};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository};

use super::{InMemoryStore, by_name, newest_first};

/// In-memory category repository.
pub struct InMemoryCategoryRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryCategoryRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Category, i32> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.categories.remove(&id).is_some() {
            tables.links.retain(|(_, category_id)| *category_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut counts: HashMap<i32, u64> = HashMap::new();
        for (_, category_id) in &tables.links {
            *counts.entry(*category_id).or_default() += 1;
        }

        let mut listed: Vec<CategoryWithCount> = tables
            .categories
            .values()
            .map(|category| CategoryWithCount {
                post_count: counts.get(&category.id).copied().unwrap_or(0),
                category: category.clone(),
            })
            .collect();
        listed.sort_by(|a, b| by_name(&a.category.name, &b.category.name));
        Ok(listed)
    }

    async fn find_posts(&self, category_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut posts: Vec<Post> = tables
            .links
            .iter()
            .filter(|(_, category)| *category == category_id)
            .filter_map(|(post_id, _)| tables.posts.get(post_id))
            .cloned()
            .collect();
        posts.sort_by(newest_first);
        Ok(posts)
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| tables.categories.contains_key(id))
            .collect())
    }

    async fn insert(&self, category: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_category_slug(&category.slug, None)?;

        let created = Category {
            id: tables.next_category_id(),
            name: category.name,
            description: category.description,
            slug: category.slug,
            created_at: category.created_at,
        };
        tables.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        if let Some(slug) = &changes.slug {
            tables.check_category_slug(slug, Some(id))?;
        }

        let category = tables.categories.get_mut(&id).ok_or(RepoError::NotFound)?;
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(slug) = changes.slug {
            category.slug = slug;
        }
        if let Some(description) = changes.description {
            category.description = description;
        }
        Ok(category.clone())
    }
}
