use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiCache::CacheKey)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiCache::Payload).text().not_null())
                    .col(ColumnDef::new(ApiCache::Category).string().null())
                    .col(ColumnDef::new(ApiCache::CreatedAt).string().not_null())
                    .col(ColumnDef::new(ApiCache::ExpiresAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_api_cache_expires_at")
                    .table(ApiCache::Table)
                    .col(ApiCache::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QueryHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QueryHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QueryHistory::UserId).big_integer().not_null())
                    .col(ColumnDef::new(QueryHistory::QueryType).string().not_null())
                    .col(ColumnDef::new(QueryHistory::Parameter).string().null())
                    .col(ColumnDef::new(QueryHistory::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Newest-first history reads filter by user and sort by time
        manager
            .create_index(
                Index::create()
                    .name("idx_query_history_user_created")
                    .table(QueryHistory::Table)
                    .col(QueryHistory::UserId)
                    .col(QueryHistory::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string().null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::PreferredLeague).string().null())
                    .col(ColumnDef::new(Users::FavoriteTeam).string().null())
                    .col(
                        ColumnDef::new(Users::NotificationsEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::MessageCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Users::LastActivity).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QueryHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApiCache::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApiCache {
    Table,
    CacheKey,
    Payload,
    Category,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum QueryHistory {
    Table,
    Id,
    UserId,
    QueryType,
    Parameter,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
    Username,
    FirstName,
    LastName,
    PreferredLeague,
    FavoriteTeam,
    NotificationsEnabled,
    MessageCount,
    CreatedAt,
    LastActivity,
}
