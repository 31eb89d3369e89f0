use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::CategoryRef;
use super::pagination::Pagination;
use crate::metrics::{self, ContentMetrics};

/// Post entity - a blog article, draft or published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post together with the categories currently linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithCategories {
    #[serde(flatten)]
    pub post: Post,
    pub categories: Vec<CategoryRef>,
    /// Plain-text preview for post cards.
    pub excerpt: String,
}

impl PostWithCategories {
    pub fn new(post: Post, categories: Vec<CategoryRef>) -> Self {
        let excerpt = metrics::excerpt(&post.content, metrics::CARD_EXCERPT_CHARS);
        Self {
            post,
            categories,
            excerpt,
        }
    }
}

/// Single-post read model: categories plus metrics derived from the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub categories: Vec<CategoryRef>,
    #[serde(flatten)]
    pub metrics: ContentMetrics,
}

impl PostDetail {
    pub fn new(post: Post, categories: Vec<CategoryRef>) -> Self {
        let metrics = ContentMetrics::of(&post.content);
        Self {
            post,
            categories,
            metrics,
        }
    }
}

/// One page of the post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<PostWithCategories>,
    pub pagination: Pagination,
}

/// Listing filter. `None` for page or limit means "use the default".
#[derive(Debug, Clone, Default)]
pub struct PostListFilter {
    pub published: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub category_ids: Vec<i32>,
}

/// Partial update of a post.
///
/// `image_url: Some(None)` clears the stored image; `None` leaves it alone.
/// `category_ids: Some(vec![])` removes every category; `None` leaves the
/// associations untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub published: Option<bool>,
    pub category_ids: Option<Vec<i32>>,
}

/// Validated row handed to storage on insert.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated column changes handed to storage on update.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<Option<String>>,
    pub published: Option<bool>,
    pub updated_at: DateTime<Utc>,
    /// Replacement association set, applied in the same transaction.
    pub category_ids: Option<Vec<i32>>,
}

impl PostChanges {
    pub fn touch(updated_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            slug: None,
            content: None,
            image_url: None,
            published: None,
            updated_at,
            category_ids: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_carries_card_excerpt() {
        let now = Utc::now();
        let body = format!("<p>{}</p>", "word ".repeat(100));
        let post = Post {
            id: 1,
            title: "Long".to_string(),
            content: body,
            slug: "long".to_string(),
            image_url: None,
            published: false,
            created_at: now,
            updated_at: now,
        };

        let item = PostWithCategories::new(post, Vec::new());

        assert!(item.excerpt.ends_with("..."));
        assert_eq!(
            item.excerpt.chars().count(),
            metrics::CARD_EXCERPT_CHARS + 3
        );
        assert!(!item.excerpt.contains('<'));
    }
}
