//! Bill primitives.
//!
//! A `Bill` is a single financial transaction inside an account book. The
//! amount is stored positive in minor units; `kind` discriminates income
//! from expense.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillKind {
    Income,
    Expense,
}

impl BillKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for BillKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid bill kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_book_id: Uuid,
    pub user_id: Uuid,
    pub amount_minor: i64,
    pub kind: String,
    pub remark: String,
    pub image_url: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_books::Entity",
        from = "Column::AccountBookId",
        to = "super::account_books::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    AccountBooks,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::bill_tags::Entity")]
    BillTags,
}

impl Related<super::account_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountBooks.def()
    }
}

impl Related<super::bill_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A bill detached from the persistence model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub account_book_id: Uuid,
    pub user_id: Uuid,
    pub amount_minor: i64,
    pub kind: BillKind,
    pub remark: String,
    pub image_url: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Model> for Bill {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            account_book_id: model.account_book_id,
            user_id: model.user_id,
            amount_minor: model.amount_minor,
            kind: BillKind::try_from(model.kind.as_str())?,
            remark: model.remark,
            image_url: model.image_url,
            occurred_at: model.occurred_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
