use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text", unique)]
    pub url: String,
    pub platform: String,
    pub title: Option<String>,
    pub submitted_by: Option<Uuid>,
    pub vote_count: i32,
    pub was_trending: bool,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
    #[sea_orm(has_many = "super::vote_snapshot::Entity")]
    VoteSnapshots,
    #[sea_orm(has_many = "super::video_category::Entity")]
    VideoCategories,
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl Related<super::vote_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoteSnapshots.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::video_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::video_category::Relation::Video.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
