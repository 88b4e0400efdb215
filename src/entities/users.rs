use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Telegram user id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    pub username: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    pub preferred_league: Option<String>,

    pub favorite_team: Option<String>,

    pub notifications_enabled: bool,

    pub message_count: i32,

    pub created_at: String,

    pub last_activity: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorite_teams::Entity")]
    FavoriteTeams,
}

impl Related<super::favorite_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteTeams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
