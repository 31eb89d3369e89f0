//! Domain entities - the core business objects.

mod association;
mod category;
mod pagination;
mod post;

pub use association::CategorySet;
pub use category::{
    Category, CategoryChanges, CategoryPatch, CategoryRef, CategoryWithCount, CategoryWithPosts,
    CreateCategory, NewCategory,
};
pub use pagination::{
    DEFAULT_PAGE_LIMIT, DEFAULT_RECENT_LIMIT, MAX_PAGE_LIMIT, PageRequest, Pagination,
};
pub use post::{
    CreatePost, NewPost, Post, PostChanges, PostDetail, PostListFilter, PostPage, PostPatch,
    PostWithCategories,
};
