use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
    sea_query::{Expr, Query},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{Bill, BillKind, EngineError, ResultEngine, Tag, bill_tags, bills, tags};

use super::{Engine, clamp_pagination, dedup_ids, normalize_optional_text, with_tx};

/// Input for creating a bill. The bill row and its tag links are written in
/// one transaction.
#[derive(Clone, Debug)]
pub struct NewBill {
    pub amount_minor: i64,
    pub kind: String,
    pub remark: String,
    pub image_url: Option<String>,
    /// Defaults to now when unset.
    pub occurred_at: Option<DateTime<Utc>>,
    pub tag_ids: Vec<Uuid>,
}

/// Input for updating a bill.
///
/// Only the mutable columns are touched; the ledger and recording-user
/// linkage never changes. The tag-link set is replaced by `tag_ids`: the
/// submitted set is the source of truth, there is no incremental diff.
#[derive(Clone, Debug)]
pub struct BillUpdate {
    pub amount_minor: i64,
    pub kind: String,
    pub remark: String,
    pub image_url: Option<String>,
    /// Keeps the stored value when unset.
    pub occurred_at: Option<DateTime<Utc>>,
    pub tag_ids: Vec<Uuid>,
}

/// Filters for listing bills. All filters combine conjunctively; `tag_ids`
/// selects bills associated with **every** listed tag.
#[derive(Clone, Debug, Default)]
pub struct BillListFilter {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub kind: Option<String>,
    pub tag_ids: Vec<Uuid>,
    /// Inclusive bounds on `occurred_at`; an absent bound is unbounded.
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub min_amount_minor: Option<i64>,
    pub max_amount_minor: Option<i64>,
    /// Substring match against the remark.
    pub keyword: Option<String>,
}

/// A bill with its tags.
#[derive(Clone, Debug, Serialize)]
pub struct BillWithTags {
    pub bill: Bill,
    pub tags: Vec<Tag>,
}

impl Engine {
    /// Creates a bill inside an account book the user is associated with.
    pub async fn create_bill(
        &self,
        book_id: Uuid,
        user_id: Uuid,
        new: NewBill,
    ) -> ResultEngine<Bill> {
        if new.amount_minor <= 0 {
            return Err(EngineError::InvalidArgument(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let kind = BillKind::try_from(new.kind.as_str())?;
        let tag_ids = dedup_ids(&new.tag_ids);

        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_access(&db_tx, book_id, user_id).await?;
            self.require_tags_exist(&db_tx, &tag_ids).await?;

            let now = Utc::now();
            let bill = bills::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                account_book_id: ActiveValue::Set(book_id),
                user_id: ActiveValue::Set(user_id),
                amount_minor: ActiveValue::Set(new.amount_minor),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                remark: ActiveValue::Set(new.remark.trim().to_string()),
                image_url: ActiveValue::Set(normalize_optional_text(new.image_url.as_deref())),
                occurred_at: ActiveValue::Set(new.occurred_at.unwrap_or(now)),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = bill.insert(&db_tx).await?;

            for tag_id in &tag_ids {
                let link = bill_tags::ActiveModel {
                    bill_id: ActiveValue::Set(model.id),
                    tag_id: ActiveValue::Set(*tag_id),
                };
                link.insert(&db_tx).await?;
            }

            Bill::try_from(model)
        })
    }

    /// Return a bill with its tags.
    pub async fn bill_with_tags(&self, bill_id: Uuid, user_id: Uuid) -> ResultEngine<BillWithTags> {
        with_tx!(self, |db_tx| {
            let model = bills::Entity::find_by_id(bill_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("bill".to_string()))?;
            self.require_ledger_access(&db_tx, model.account_book_id, user_id)
                .await?;

            let tag_rows: Vec<(bill_tags::Model, Option<tags::Model>)> = bill_tags::Entity::find()
                .filter(bill_tags::Column::BillId.eq(bill_id))
                .find_also_related(tags::Entity)
                .all(&db_tx)
                .await?;
            let tags = tag_rows
                .into_iter()
                .filter_map(|(_, tag)| tag)
                .map(Tag::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(BillWithTags {
                bill: Bill::try_from(model)?,
                tags,
            })
        })
    }

    /// Lists an account book's bills, newest first.
    ///
    /// Returns the requested page with each bill's tags, plus the total
    /// count over the same predicate.
    pub async fn list_bills(
        &self,
        book_id: Uuid,
        user_id: Uuid,
        filter: BillListFilter,
    ) -> ResultEngine<(Vec<BillWithTags>, u64)> {
        let (page, page_size) = clamp_pagination(filter.page, filter.page_size);
        let kind = filter
            .kind
            .as_deref()
            .map(BillKind::try_from)
            .transpose()?;
        let tag_ids = dedup_ids(&filter.tag_ids);

        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_access(&db_tx, book_id, user_id).await?;

            let mut query =
                bills::Entity::find().filter(bills::Column::AccountBookId.eq(book_id));

            if let Some(kind) = kind {
                query = query.filter(bills::Column::Kind.eq(kind.as_str()));
            }
            if !tag_ids.is_empty() {
                // Bills holding every listed tag: count-matching over the
                // join table.
                let matching = Query::select()
                    .column(bill_tags::Column::BillId)
                    .from(bill_tags::Entity)
                    .and_where(bill_tags::Column::TagId.is_in(tag_ids.iter().copied()))
                    .group_by_col(bill_tags::Column::BillId)
                    .and_having(
                        Expr::cust("COUNT(DISTINCT tag_id)").eq(tag_ids.len() as i64),
                    )
                    .to_owned();
                query = query.filter(bills::Column::Id.in_subquery(matching));
            }
            if let Some(start) = filter.start_time {
                query = query.filter(bills::Column::OccurredAt.gte(start));
            }
            if let Some(end) = filter.end_time {
                query = query.filter(bills::Column::OccurredAt.lte(end));
            }
            if let Some(min) = filter.min_amount_minor {
                query = query.filter(bills::Column::AmountMinor.gte(min));
            }
            if let Some(max) = filter.max_amount_minor {
                query = query.filter(bills::Column::AmountMinor.lte(max));
            }
            if let Some(keyword) = normalize_optional_text(filter.keyword.as_deref()) {
                query = query.filter(bills::Column::Remark.contains(keyword.as_str()));
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(bills::Column::OccurredAt)
                .limit(page_size)
                .offset((page - 1) * page_size)
                .all(&db_tx)
                .await?;

            let bill_ids: Vec<Uuid> = models.iter().map(|model| model.id).collect();
            let mut tags_by_bill: HashMap<Uuid, Vec<Tag>> = HashMap::new();
            if !bill_ids.is_empty() {
                let tag_rows: Vec<(bill_tags::Model, Option<tags::Model>)> =
                    bill_tags::Entity::find()
                        .filter(bill_tags::Column::BillId.is_in(bill_ids))
                        .find_also_related(tags::Entity)
                        .all(&db_tx)
                        .await?;
                for (link, tag) in tag_rows {
                    if let Some(tag) = tag {
                        tags_by_bill
                            .entry(link.bill_id)
                            .or_default()
                            .push(Tag::try_from(tag)?);
                    }
                }
            }

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                let tags = tags_by_bill.remove(&model.id).unwrap_or_default();
                out.push(BillWithTags {
                    bill: Bill::try_from(model)?,
                    tags,
                });
            }

            Ok((out, total))
        })
    }

    /// Updates a bill's mutable columns and replaces its tag-link set.
    pub async fn update_bill(
        &self,
        bill_id: Uuid,
        user_id: Uuid,
        update: BillUpdate,
    ) -> ResultEngine<Bill> {
        if update.amount_minor <= 0 {
            return Err(EngineError::InvalidArgument(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let kind = BillKind::try_from(update.kind.as_str())?;
        let tag_ids = dedup_ids(&update.tag_ids);

        with_tx!(self, |db_tx| {
            let model = bills::Entity::find_by_id(bill_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("bill".to_string()))?;
            self.require_ledger_access(&db_tx, model.account_book_id, user_id)
                .await?;
            self.require_tags_exist(&db_tx, &tag_ids).await?;

            let active = bills::ActiveModel {
                id: ActiveValue::Set(bill_id),
                amount_minor: ActiveValue::Set(update.amount_minor),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                remark: ActiveValue::Set(update.remark.trim().to_string()),
                image_url: ActiveValue::Set(normalize_optional_text(
                    update.image_url.as_deref(),
                )),
                occurred_at: ActiveValue::Set(update.occurred_at.unwrap_or(model.occurred_at)),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;

            bill_tags::Entity::delete_many()
                .filter(bill_tags::Column::BillId.eq(bill_id))
                .exec(&db_tx)
                .await?;
            for tag_id in &tag_ids {
                let link = bill_tags::ActiveModel {
                    bill_id: ActiveValue::Set(bill_id),
                    tag_id: ActiveValue::Set(*tag_id),
                };
                link.insert(&db_tx).await?;
            }

            Bill::try_from(model)
        })
    }

    /// Deletes a bill and its tag links, atomically.
    pub async fn delete_bill(&self, bill_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = bills::Entity::find_by_id(bill_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("bill".to_string()))?;
            self.require_ledger_access(&db_tx, model.account_book_id, user_id)
                .await?;

            bill_tags::Entity::delete_many()
                .filter(bill_tags::Column::BillId.eq(bill_id))
                .exec(&db_tx)
                .await?;
            bills::Entity::delete_by_id(bill_id).exec(&db_tx).await?;

            Ok(())
        })
    }
}
