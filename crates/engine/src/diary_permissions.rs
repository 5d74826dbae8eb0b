//! Diary visibility levels.
//!
//! Exactly one row per diary, written in the diary-creation transaction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Private,
    Public,
    SharedRead,
    SharedEdit,
}

impl PermissionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::SharedRead => "shared_read",
            Self::SharedEdit => "shared_edit",
        }
    }
}

impl TryFrom<&str> for PermissionLevel {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            "shared_read" => Ok(Self::SharedRead),
            "shared_edit" => Ok(Self::SharedEdit),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid permission level: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "diary_permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub diary_id: Uuid,
    pub level: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::diaries::Entity",
        from = "Column::DiaryId",
        to = "super::diaries::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Diaries,
}

impl Related<super::diaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_round_trips() {
        for level in [
            PermissionLevel::Private,
            PermissionLevel::Public,
            PermissionLevel::SharedRead,
            PermissionLevel::SharedEdit,
        ] {
            assert_eq!(PermissionLevel::try_from(level.as_str()).unwrap(), level);
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(PermissionLevel::try_from("friends_only").is_err());
    }
}
