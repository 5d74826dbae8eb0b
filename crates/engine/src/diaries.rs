//! Diary entries.
//!
//! Access is relation-based: there is no owner column, a diary is reachable
//! through its `diary_users` rows and the earliest row identifies the
//! creator. `pageview` and `like_count` are denormalized counters kept in
//! sync inside the same transaction as the authoritative row change.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "diaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub address: Option<String>,
    pub pageview: i64,
    pub like_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::diary_users::Entity")]
    DiaryUsers,
    #[sea_orm(has_many = "super::diary_tags::Entity")]
    DiaryTags,
    #[sea_orm(has_one = "super::diary_permissions::Entity")]
    DiaryPermissions,
    #[sea_orm(has_many = "super::diary_images::Entity")]
    DiaryImages,
    #[sea_orm(has_many = "super::diary_videos::Entity")]
    DiaryVideos,
    #[sea_orm(has_many = "super::diary_likes::Entity")]
    DiaryLikes,
}

impl Related<super::diary_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiaryUsers.def()
    }
}

impl Related<super::diary_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiaryTags.def()
    }
}

impl Related<super::diary_permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiaryPermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A diary entry detached from the persistence model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub address: Option<String>,
    pub pageview: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Diary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            address: model.address,
            pageview: model.pageview,
            like_count: model.like_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
