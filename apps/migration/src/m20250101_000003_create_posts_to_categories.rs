use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_posts::Posts;
use crate::m20250101_000002_create_categories::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostsToCategories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostsToCategories::PostId).integer().not_null())
                    .col(
                        ColumnDef::new(PostsToCategories::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PostsToCategories::PostId)
                            .col(PostsToCategories::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_to_categories_post_id")
                            .from(PostsToCategories::Table, PostsToCategories::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_to_categories_category_id")
                            .from(PostsToCategories::Table, PostsToCategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The composite key covers lookups by post; counts group by category.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_to_categories_category_id")
                    .table(PostsToCategories::Table)
                    .col(PostsToCategories::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostsToCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PostsToCategories {
    Table,
    PostId,
    CategoryId,
}
