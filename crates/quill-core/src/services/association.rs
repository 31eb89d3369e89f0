use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::CategorySet;
use crate::error::DomainError;
use crate::ports::CategoryRepository;

/// Resolves the category set a post should end up linked to.
///
/// Storage performs the replacement itself (delete every edge of the post,
/// then insert the new set) inside the post's write transaction; this type
/// makes sure the set it is handed is deduplicated and references only
/// existing categories.
#[derive(Clone)]
pub struct AssociationManager {
    categories: Arc<dyn CategoryRepository>,
}

impl AssociationManager {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn resolve(&self, requested: &[i32]) -> Result<CategorySet, DomainError> {
        let set = CategorySet::from_ids(requested);
        if set.is_empty() {
            return Ok(set);
        }

        let existing: HashSet<i32> = self
            .categories
            .existing_ids(set.ids())
            .await?
            .into_iter()
            .collect();

        let missing: Vec<String> = set
            .ids()
            .iter()
            .filter(|id| !existing.contains(*id))
            .map(ToString::to_string)
            .collect();

        if !missing.is_empty() {
            tracing::debug!(missing = ?missing, "Rejected unknown category ids");
            return Err(DomainError::validation(format!(
                "Unknown category ids: {}",
                missing.join(", ")
            )));
        }

        Ok(set)
    }
}
