//! Services - the rules that sit between callers and storage.

mod association;
mod category_service;
mod post_service;

pub use association::AssociationManager;
pub use category_service::CategoryService;
pub use post_service::PostService;

use crate::ports::Repositories;

/// Every service, built over one set of repositories.
#[derive(Clone)]
pub struct BlogServices {
    pub categories: CategoryService,
    pub posts: PostService,
}

impl BlogServices {
    pub fn new(repos: Repositories) -> Self {
        Self {
            categories: CategoryService::new(repos.categories.clone()),
            posts: PostService::new(repos.posts, repos.categories),
        }
    }
}
