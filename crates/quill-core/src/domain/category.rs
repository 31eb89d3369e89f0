use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::Post;

/// Category entity - a named bucket posts can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Category with its post count, computed from association rows at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub post_count: u64,
}

/// Category with every post filed under it, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithPosts {
    #[serde(flatten)]
    pub category: Category,
    pub posts: Vec<Post>,
}

/// The category fields embedded in post read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryRef {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, Default)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update of a category. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Validated row handed to storage on insert.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Validated column changes handed to storage on update.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.description.is_none()
    }
}
