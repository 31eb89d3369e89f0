//! PostgreSQL repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait, Unchanged,
};

use quill_core::domain::{
    Category, CategoryChanges, CategoryRef, CategoryWithCount, NewCategory, NewPost, Post,
    PostChanges,
};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostRepository, Repositories};

use super::associations;
use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_category;
use super::postgres_base::{PostgresBaseRepository, SluggedEntity, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

impl SluggedEntity for PostEntity {
    fn slug_column() -> post::Column {
        post::Column::Slug
    }
}

impl SluggedEntity for CategoryEntity {
    fn slug_column() -> category::Column {
        category::Column::Slug
    }
}

/// Both repositories over one connection pool.
pub fn repositories(db: DbConn) -> Repositories {
    Repositories {
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db)),
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let categories = CategoryEntity::find()
            .order_by_asc(associations::category_name_order())
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        let counts = associations::post_counts(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(categories
            .into_iter()
            .map(|model| CategoryWithCount {
                post_count: counts.get(&model.id).copied().unwrap_or(0),
                category: model.into(),
            })
            .collect())
    }

    async fn find_posts(&self, category_id: i32) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                post::Relation::PostCategory.def(),
            )
            .filter(post_category::Column::CategoryId.eq(category_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        CategoryEntity::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn insert(&self, category: NewCategory) -> Result<Category, RepoError> {
        let model = category::ActiveModel::from(category)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, RepoError> {
        if changes.is_empty() {
            return CategoryEntity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .map(Into::into)
                .ok_or(RepoError::NotFound);
        }

        let mut active = category::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(
        &self,
        published: Option<bool>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Post>, u64), RepoError> {
        let mut query = PostEntity::find();
        if let Some(published) = published {
            query = query.filter(post::Column::Published.eq(published));
        }

        let total = query.clone().count(&self.db).await.map_err(map_db_err)?;
        // Past the end there is nothing to fetch, and OFFSET binds as a signed
        // BIGINT, so huge page numbers must never reach the query.
        if offset >= total {
            tracing::debug!(offset, total, "Page past the end");
            return Ok((Vec::new(), total));
        }

        let rows = query
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn categories_for(
        &self,
        post_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<CategoryRef>>, RepoError> {
        associations::categories_for(&self.db, post_ids)
            .await
            .map_err(map_db_err)
    }

    async fn insert(&self, post: NewPost, category_ids: &[i32]) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel::from(post)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        associations::insert_links(&txn, model.id, category_ids)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut active = post::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(changes.updated_at.into()),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(published) = changes.published {
            active.published = Set(published);
        }

        let model = active.update(&txn).await.map_err(map_db_err)?;
        if let Some(category_ids) = &changes.category_ids {
            associations::replace_links(&txn, id, category_ids)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }
}
