//! Reusable labels, partitioned by category.
//!
//! `(name, category)` is unique; a tag belongs to exactly one category and
//! cannot be deleted while any bill or diary references it.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Bill,
    Diary,
}

impl TagCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bill => "bill",
            Self::Diary => "diary",
        }
    }
}

impl TryFrom<&str> for TagCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "bill" => Ok(Self::Bill),
            "diary" => Ok(Self::Diary),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid tag category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub category: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::diary_tags::Entity")]
    DiaryTags,
    #[sea_orm(has_many = "super::bill_tags::Entity")]
    BillTags,
}

impl Related<super::diary_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiaryTags.def()
    }
}

impl Related<super::bill_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A tag detached from the persistence model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub category: TagCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Model> for Tag {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            kind: model.kind,
            category: TagCategory::try_from(model.category.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips() {
        for category in [TagCategory::Bill, TagCategory::Diary] {
            assert_eq!(
                TagCategory::try_from(category.as_str()).unwrap(),
                category
            );
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(TagCategory::try_from("ledger").is_err());
    }
}
