//! The association table: batched reads and replace-on-update writes.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use quill_core::domain::CategoryRef;

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post_category::{self, Entity as PostCategoryEntity};

#[derive(Debug, FromQueryResult)]
struct CategoryPostCount {
    category_id: i32,
    post_count: i64,
}

/// Link `post_id` to every category in `category_ids`.
pub(crate) async fn insert_links<C>(
    conn: &C,
    post_id: i32,
    category_ids: &[i32],
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if category_ids.is_empty() {
        return Ok(());
    }

    let links = category_ids
        .iter()
        .map(|&category_id| post_category::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category_id),
        });

    PostCategoryEntity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Make `category_ids` the exact edge set of `post_id`: delete, then insert.
///
/// Run it on a transaction so readers never see the post with no categories.
pub(crate) async fn replace_links<C>(
    conn: &C,
    post_id: i32,
    category_ids: &[i32],
) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let removed = PostCategoryEntity::delete_many()
        .filter(post_category::Column::PostId.eq(post_id))
        .exec(conn)
        .await?;

    insert_links(conn, post_id, category_ids).await?;

    tracing::debug!(
        post_id,
        removed = removed.rows_affected,
        inserted = category_ids.len(),
        "Replaced post categories"
    );
    Ok(())
}

/// Categories of several posts in one join, keyed by post ID.
pub(crate) async fn categories_for<C>(
    conn: &C,
    post_ids: &[i32],
) -> Result<HashMap<i32, Vec<CategoryRef>>, DbErr>
where
    C: ConnectionTrait,
{
    let mut grouped: HashMap<i32, Vec<CategoryRef>> = HashMap::new();
    if post_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = PostCategoryEntity::find()
        .filter(post_category::Column::PostId.is_in(post_ids.iter().copied()))
        .find_also_related(CategoryEntity)
        .order_by_asc(category_name_order())
        .order_by_asc(category::Column::Name)
        .all(conn)
        .await?;

    for (link, category) in rows {
        if let Some(category) = category {
            grouped
                .entry(link.post_id)
                .or_default()
                .push(category.into());
        }
    }
    Ok(grouped)
}

/// `LOWER(categories.name)`: category lists sort case-insensitively, with the
/// raw name as tie-break, matching the in-memory store.
pub(crate) fn category_name_order() -> SimpleExpr {
    Func::lower(Expr::col((CategoryEntity, category::Column::Name))).into()
}

/// Association count per category in one aggregate query.
pub(crate) async fn post_counts<C>(conn: &C) -> Result<HashMap<i32, u64>, DbErr>
where
    C: ConnectionTrait,
{
    let counts = PostCategoryEntity::find()
        .select_only()
        .column(post_category::Column::CategoryId)
        .column_as(Expr::col(post_category::Column::PostId).count(), "post_count")
        .group_by(post_category::Column::CategoryId)
        .into_model::<CategoryPostCount>()
        .all(conn)
        .await?;

    Ok(counts
        .into_iter()
        .map(|row| (row.category_id, u64::try_from(row.post_count).unwrap_or(0)))
        .collect())
}
