//! Users table.
//!
//! A user is created on the first successful external login; the
//! `(provider, subject)` identity pair is unique and immutable afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider: String,
    pub subject: String,
    pub user_name: String,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::diary_users::Entity")]
    DiaryUsers,
    #[sea_orm(has_many = "super::account_book_users::Entity")]
    AccountBookUsers,
    #[sea_orm(has_many = "super::diary_likes::Entity")]
    DiaryLikes,
}

impl Related<super::diary_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiaryUsers.def()
    }
}

impl Related<super::account_book_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountBookUsers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A user detached from the persistence model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub provider: String,
    pub subject: String,
    pub user_name: String,
    pub avatar: Option<String>,
    pub email: Option<String>,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            provider: model.provider,
            subject: model.subject,
            user_name: model.user_name,
            avatar: model.avatar,
            email: model.email,
        }
    }
}
