/// Target category set for a post, deduplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    ids: Vec<i32>,
}

impl CategorySet {
    pub fn from_ids(requested: &[i32]) -> Self {
        let mut ids = Vec::with_capacity(requested.len());
        for id in requested {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        Self { ids }
    }

    pub fn ids(&self) -> &[i32] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.ids
    }
}
