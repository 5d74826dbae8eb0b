use chrono::Utc;
use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Tag, TagCategory, bill_tags, diary_tags, tags};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Creates a tag; `(name, category)` must be unique.
    pub async fn create_tag(&self, name: &str, kind: &str, category: &str) -> ResultEngine<Tag> {
        let name = normalize_required_text(name, "tag name")?;
        let category = TagCategory::try_from(category)?;

        with_tx!(self, |db_tx| {
            let duplicate = tags::Entity::find()
                .filter(tags::Column::Name.eq(name.as_str()))
                .filter(tags::Column::Category.eq(category.as_str()))
                .one(&db_tx)
                .await?;
            if duplicate.is_some() {
                return Err(EngineError::Conflict(format!(
                    "tag {name} already exists in category {}",
                    category.as_str()
                )));
            }

            let now = Utc::now();
            let active = tags::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name.clone()),
                kind: ActiveValue::Set(kind.trim().to_string()),
                category: ActiveValue::Set(category.as_str().to_string()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = active.insert(&db_tx).await?;
            Tag::try_from(model)
        })
    }

    /// Return a tag by id.
    pub async fn tag(&self, tag_id: Uuid) -> ResultEngine<Tag> {
        with_tx!(self, |db_tx| {
            let model = tags::Entity::find_by_id(tag_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("tag".to_string()))?;
            Tag::try_from(model)
        })
    }

    /// Lists tags, newest first, optionally filtered by category.
    pub async fn list_tags(&self, category: Option<&str>) -> ResultEngine<Vec<Tag>> {
        let category = category.map(TagCategory::try_from).transpose()?;

        with_tx!(self, |db_tx| {
            let mut query = tags::Entity::find().order_by_desc(tags::Column::CreatedAt);
            if let Some(category) = category {
                query = query.filter(tags::Column::Category.eq(category.as_str()));
            }
            let models = query.all(&db_tx).await?;
            models.into_iter().map(Tag::try_from).collect()
        })
    }

    /// Updates a tag; the new `(name, category)` must not collide with a
    /// different tag.
    pub async fn update_tag(
        &self,
        tag_id: Uuid,
        name: &str,
        kind: &str,
        category: &str,
    ) -> ResultEngine<Tag> {
        let name = normalize_required_text(name, "tag name")?;
        let category = TagCategory::try_from(category)?;

        with_tx!(self, |db_tx| {
            tags::Entity::find_by_id(tag_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("tag".to_string()))?;

            let duplicate = tags::Entity::find()
                .filter(tags::Column::Name.eq(name.as_str()))
                .filter(tags::Column::Category.eq(category.as_str()))
                .filter(tags::Column::Id.ne(tag_id))
                .one(&db_tx)
                .await?;
            if duplicate.is_some() {
                return Err(EngineError::Conflict(format!(
                    "tag {name} already exists in category {}",
                    category.as_str()
                )));
            }

            let active = tags::ActiveModel {
                id: ActiveValue::Set(tag_id),
                name: ActiveValue::Set(name.clone()),
                kind: ActiveValue::Set(kind.trim().to_string()),
                category: ActiveValue::Set(category.as_str().to_string()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Tag::try_from(model)
        })
    }

    /// Deletes a tag, rejecting the request while any bill or diary still
    /// references it.
    pub async fn delete_tag(&self, tag_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            tags::Entity::find_by_id(tag_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("tag".to_string()))?;

            let bill_refs = bill_tags::Entity::find()
                .filter(bill_tags::Column::TagId.eq(tag_id))
                .count(&db_tx)
                .await?;
            let diary_refs = diary_tags::Entity::find()
                .filter(diary_tags::Column::TagId.eq(tag_id))
                .count(&db_tx)
                .await?;
            if bill_refs > 0 || diary_refs > 0 {
                return Err(EngineError::Conflict(
                    "tag is still referenced by bills or diaries".to_string(),
                ));
            }

            tags::Entity::delete_by_id(tag_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
