use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoriteTeams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FavoriteTeams::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FavoriteTeams::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FavoriteTeams::TeamId).integer().not_null())
                    .col(ColumnDef::new(FavoriteTeams::TeamName).string().not_null())
                    .col(ColumnDef::new(FavoriteTeams::AddedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_teams_user_team")
                    .table(FavoriteTeams::Table)
                    .col(FavoriteTeams::UserId)
                    .col(FavoriteTeams::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteTeams::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FavoriteTeams {
    Table,
    Id,
    UserId,
    TeamId,
    TeamName,
    AddedAt,
}
