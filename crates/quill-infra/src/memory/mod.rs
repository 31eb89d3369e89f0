//! In-memory storage - used when no database is configured, and in tests.
//!
//! One `tokio::sync::RwLock` guards every table, so each repository call is
//! atomic with respect to the others. Data is lost on process restart.

mod categories;
mod posts;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use quill_core::domain::{Category, CategoryRef, Post};
use quill_core::error::RepoError;
use quill_core::ports::Repositories;

pub use categories::InMemoryCategoryRepository;
pub use posts::InMemoryPostRepository;

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) posts: BTreeMap<i32, Post>,
    pub(crate) categories: BTreeMap<i32, Category>,
    /// `(post_id, category_id)` edges.
    pub(crate) links: BTreeSet<(i32, i32)>,
    last_post_id: i32,
    last_category_id: i32,
}

impl Tables {
    pub(crate) fn next_post_id(&mut self) -> i32 {
        self.last_post_id += 1;
        self.last_post_id
    }

    pub(crate) fn next_category_id(&mut self) -> i32 {
        self.last_category_id += 1;
        self.last_category_id
    }

    /// Mirrors the unique index on `posts.slug`.
    pub(crate) fn check_post_slug(&self, slug: &str, owner: Option<i32>) -> Result<(), RepoError> {
        let taken = self
            .posts
            .values()
            .any(|p| p.slug == slug && Some(p.id) != owner);
        if taken {
            return Err(RepoError::Constraint(format!("posts.slug '{slug}' already exists")));
        }
        Ok(())
    }

    /// Mirrors the unique index on `categories.slug`.
    pub(crate) fn check_category_slug(
        &self,
        slug: &str,
        owner: Option<i32>,
    ) -> Result<(), RepoError> {
        let taken = self
            .categories
            .values()
            .any(|c| c.slug == slug && Some(c.id) != owner);
        if taken {
            return Err(RepoError::Constraint(format!(
                "categories.slug '{slug}' already exists"
            )));
        }
        Ok(())
    }

    /// Mirrors the foreign key on `posts_to_categories.category_id`.
    pub(crate) fn check_categories_exist(&self, category_ids: &[i32]) -> Result<(), RepoError> {
        match category_ids
            .iter()
            .find(|id| !self.categories.contains_key(*id))
        {
            Some(missing) => Err(RepoError::ForeignKey(format!(
                "category {missing} does not exist"
            ))),
            None => Ok(()),
        }
    }

    /// Replace every edge of `post_id` with `category_ids`.
    ///
    /// Callers validate first so a failure never leaves a half-replaced set.
    pub(crate) fn replace_links(&mut self, post_id: i32, category_ids: &[i32]) {
        self.links.retain(|(post, _)| *post != post_id);
        self.links
            .extend(category_ids.iter().map(|&category_id| (post_id, category_id)));
    }

    pub(crate) fn categories_of(&self, post_id: i32) -> Vec<CategoryRef> {
        let mut linked: Vec<CategoryRef> = self
            .links
            .range((post_id, i32::MIN)..=(post_id, i32::MAX))
            .filter_map(|(_, category_id)| self.categories.get(category_id))
            .cloned()
            .map(CategoryRef::from)
            .collect();
        linked.sort_by(|a, b| by_name(&a.name, &b.name));
        linked
    }
}

/// Shared tables behind the in-memory repositories.
#[derive(Default)]
pub struct InMemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository handles sharing this store.
    pub fn repositories(self: Arc<Self>) -> Repositories {
        Repositories {
            posts: Arc::new(InMemoryPostRepository::new(self.clone())),
            categories: Arc::new(InMemoryCategoryRepository::new(self)),
        }
    }
}

/// Case-insensitive name order, raw name as tie-break. Mirrors
/// `ORDER BY LOWER(name), name` in the PostgreSQL repositories.
pub(crate) fn by_name(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Newest first; ties (same instant) broken by the higher ID.
pub(crate) fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: i32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: None,
            slug: name.to_lowercase(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_replace_links_only_touches_one_post() {
        let mut tables = Tables::default();
        tables.categories.insert(1, category(1, "Rust"));
        tables.categories.insert(2, category(2, "Go"));
        tables.links.extend([(10, 1), (10, 2), (11, 1)]);

        tables.replace_links(10, &[2]);

        assert_eq!(
            tables.links.iter().copied().collect::<Vec<_>>(),
            vec![(10, 2), (11, 1)]
        );
    }

    #[test]
    fn test_categories_of_sorted_by_name() {
        let mut tables = Tables::default();
        tables.categories.insert(1, category(1, "Rust"));
        tables.categories.insert(2, category(2, "Go"));
        tables.links.extend([(10, 1), (10, 2)]);

        let names: Vec<String> = tables.categories_of(10).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Go", "Rust"]);
        assert!(tables.categories_of(11).is_empty());
    }

    #[test]
    fn test_name_order_ignores_case() {
        let mut tables = Tables::default();
        tables.categories.insert(1, category(1, "Banana"));
        tables.categories.insert(2, category(2, "apple"));
        tables.categories.insert(3, category(3, "Cherry"));
        tables.links.extend([(10, 1), (10, 2), (10, 3)]);

        let names: Vec<String> = tables.categories_of(10).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_missing_category_is_foreign_key_error() {
        let mut tables = Tables::default();
        tables.categories.insert(1, category(1, "Rust"));

        assert!(tables.check_categories_exist(&[1]).is_ok());
        assert!(matches!(
            tables.check_categories_exist(&[1, 7]),
            Err(RepoError::ForeignKey(_))
        ));
    }

    #[test]
    fn test_slug_check_ignores_owner() {
        let mut tables = Tables::default();
        tables.categories.insert(1, category(1, "Rust"));

        assert!(tables.check_category_slug("rust", Some(1)).is_ok());
        assert!(matches!(
            tables.check_category_slug("rust", Some(2)),
            Err(RepoError::Constraint(_))
        ));
        assert!(tables.check_category_slug("rust", None).is_err());
    }
}
