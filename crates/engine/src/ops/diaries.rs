use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Diary, EngineError, PermissionLevel, ResultEngine, Tag, diaries, diary_images, diary_likes,
    diary_permissions, diary_tags, diary_users, diary_videos, tags,
};

use super::{
    Engine, clamp_pagination, dedup_ids, normalize_optional_text, normalize_required_text, with_tx,
};

/// Input for creating a diary. The creator's association, the permission
/// row, tag links and media rows are all written in the same transaction as
/// the diary itself.
#[derive(Clone, Debug)]
pub struct NewDiary {
    pub title: String,
    pub content: String,
    pub address: Option<String>,
    pub level: String,
    pub tag_ids: Vec<Uuid>,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
}

/// Partial diary update.
///
/// `None` leaves the field untouched; submitting a set (tags, images,
/// videos) replaces the stored set with exactly what was submitted.
#[derive(Clone, Debug, Default)]
pub struct DiaryUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub address: Option<String>,
    pub level: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
    pub image_urls: Option<Vec<String>>,
    pub video_urls: Option<Vec<String>>,
}

/// Filters for listing diaries. All filters combine conjunctively.
#[derive(Clone, Debug, Default)]
pub struct DiaryListFilter {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Substring match against title or content.
    pub keyword: Option<String>,
    /// Match-any tag filter (diaries holding at least one of the tags).
    pub tag_ids: Vec<Uuid>,
    pub level: Option<String>,
}

/// A diary with everything attached to it.
#[derive(Clone, Debug, Serialize)]
pub struct DiaryDetails {
    pub diary: Diary,
    pub tags: Vec<Tag>,
    pub level: PermissionLevel,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
}

impl Engine {
    /// Creates a diary with its initial association, permission level, tag
    /// links and media rows, atomically.
    pub async fn create_diary(&self, user_id: Uuid, new: NewDiary) -> ResultEngine<Diary> {
        let title = normalize_required_text(&new.title, "diary title")?;
        let level = PermissionLevel::try_from(new.level.as_str())?;
        let tag_ids = dedup_ids(&new.tag_ids);

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            self.require_tags_exist(&db_tx, &tag_ids).await?;

            let now = Utc::now();
            let diary_id = Uuid::new_v4();
            let diary = diaries::ActiveModel {
                id: ActiveValue::Set(diary_id),
                title: ActiveValue::Set(title.clone()),
                content: ActiveValue::Set(new.content.clone()),
                address: ActiveValue::Set(normalize_optional_text(new.address.as_deref())),
                pageview: ActiveValue::Set(0),
                like_count: ActiveValue::Set(0),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = diary.insert(&db_tx).await?;

            let association = diary_users::ActiveModel {
                seq: ActiveValue::NotSet,
                diary_id: ActiveValue::Set(diary_id),
                user_id: ActiveValue::Set(user_id),
                created_at: ActiveValue::Set(now),
            };
            association.insert(&db_tx).await?;

            let permission = diary_permissions::ActiveModel {
                diary_id: ActiveValue::Set(diary_id),
                level: ActiveValue::Set(level.as_str().to_string()),
            };
            permission.insert(&db_tx).await?;

            for tag_id in &tag_ids {
                let link = diary_tags::ActiveModel {
                    diary_id: ActiveValue::Set(diary_id),
                    tag_id: ActiveValue::Set(*tag_id),
                };
                link.insert(&db_tx).await?;
            }

            self.insert_diary_media(&db_tx, diary_id, &new.image_urls, &new.video_urls)
                .await?;

            Ok(Diary::from(model))
        })
    }

    /// Returns a diary with tags, permission level and media.
    ///
    /// Readable by any associate, or by anyone when the diary is public.
    /// Every successful call increments the pageview counter; repeat views
    /// are not deduplicated.
    pub async fn diary_details(&self, diary_id: Uuid, user_id: Uuid) -> ResultEngine<DiaryDetails> {
        with_tx!(self, |db_tx| {
            self.require_diary_exists(&db_tx, diary_id).await?;

            let permission = diary_permissions::Entity::find_by_id(diary_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("diary permission".to_string()))?;
            let level = PermissionLevel::try_from(permission.level.as_str())?;

            if level != PermissionLevel::Public {
                self.require_diary_access(&db_tx, diary_id, user_id).await?;
            }

            diaries::Entity::update_many()
                .col_expr(
                    diaries::Column::Pageview,
                    Expr::col(diaries::Column::Pageview).add(1),
                )
                .filter(diaries::Column::Id.eq(diary_id))
                .exec(&db_tx)
                .await?;

            let model = self.require_diary_exists(&db_tx, diary_id).await?;

            let tag_rows: Vec<(diary_tags::Model, Option<tags::Model>)> =
                diary_tags::Entity::find()
                    .filter(diary_tags::Column::DiaryId.eq(diary_id))
                    .find_also_related(tags::Entity)
                    .all(&db_tx)
                    .await?;
            let tags = tag_rows
                .into_iter()
                .filter_map(|(_, tag)| tag)
                .map(Tag::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let image_urls = diary_images::Entity::find()
                .filter(diary_images::Column::DiaryId.eq(diary_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|image| image.image_url)
                .collect();
            let video_urls = diary_videos::Entity::find()
                .filter(diary_videos::Column::DiaryId.eq(diary_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|video| video.video_url)
                .collect();

            Ok(DiaryDetails {
                diary: Diary::from(model),
                tags,
                level,
                image_urls,
                video_urls,
            })
        })
    }

    /// Lists the caller's diaries, newest first.
    ///
    /// Returns the requested page and the total count over the same
    /// predicate.
    pub async fn list_diaries(
        &self,
        user_id: Uuid,
        filter: DiaryListFilter,
    ) -> ResultEngine<(Vec<Diary>, u64)> {
        let (page, page_size) = clamp_pagination(filter.page, filter.page_size);
        let level = filter
            .level
            .as_deref()
            .map(PermissionLevel::try_from)
            .transpose()?;
        let tag_ids = dedup_ids(&filter.tag_ids);

        with_tx!(self, |db_tx| {
            let mut query = diaries::Entity::find()
                .join(JoinType::InnerJoin, diaries::Relation::DiaryUsers.def())
                .filter(diary_users::Column::UserId.eq(user_id));

            if let Some(level) = level {
                query = query
                    .join(JoinType::InnerJoin, diaries::Relation::DiaryPermissions.def())
                    .filter(diary_permissions::Column::Level.eq(level.as_str()));
            }

            if let Some(keyword) = normalize_optional_text(filter.keyword.as_deref()) {
                query = query.filter(
                    Condition::any()
                        .add(diaries::Column::Title.contains(keyword.as_str()))
                        .add(diaries::Column::Content.contains(keyword.as_str())),
                );
            }

            if !tag_ids.is_empty() {
                query = query
                    .join(JoinType::InnerJoin, diaries::Relation::DiaryTags.def())
                    .filter(diary_tags::Column::TagId.is_in(tag_ids.iter().copied()))
                    .distinct();
            }

            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(diaries::Column::CreatedAt)
                .limit(page_size)
                .offset((page - 1) * page_size)
                .all(&db_tx)
                .await?;

            Ok((models.into_iter().map(Diary::from).collect(), total))
        })
    }

    /// Updates a diary.
    ///
    /// Editing is open to every current associate, which is broader than
    /// deletion (creator-only).
    pub async fn update_diary(
        &self,
        diary_id: Uuid,
        user_id: Uuid,
        update: DiaryUpdate,
    ) -> ResultEngine<Diary> {
        let level = update
            .level
            .as_deref()
            .map(PermissionLevel::try_from)
            .transpose()?;

        with_tx!(self, |db_tx| {
            self.require_diary_exists(&db_tx, diary_id).await?;
            self.require_diary_access(&db_tx, diary_id, user_id).await?;

            let mut active = diaries::ActiveModel {
                id: ActiveValue::Set(diary_id),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(title) = update.title.as_deref() {
                active.title = ActiveValue::Set(normalize_required_text(title, "diary title")?);
            }
            if let Some(content) = update.content.as_deref() {
                active.content = ActiveValue::Set(content.to_string());
            }
            if let Some(address) = update.address.as_deref() {
                active.address = ActiveValue::Set(normalize_optional_text(Some(address)));
            }
            let model = active.update(&db_tx).await?;

            if let Some(level) = level {
                let permission = diary_permissions::ActiveModel {
                    diary_id: ActiveValue::Set(diary_id),
                    level: ActiveValue::Set(level.as_str().to_string()),
                };
                permission.update(&db_tx).await?;
            }

            if let Some(tag_ids) = update.tag_ids.as_deref() {
                let tag_ids = dedup_ids(tag_ids);
                self.require_tags_exist(&db_tx, &tag_ids).await?;
                diary_tags::Entity::delete_many()
                    .filter(diary_tags::Column::DiaryId.eq(diary_id))
                    .exec(&db_tx)
                    .await?;
                for tag_id in tag_ids {
                    let link = diary_tags::ActiveModel {
                        diary_id: ActiveValue::Set(diary_id),
                        tag_id: ActiveValue::Set(tag_id),
                    };
                    link.insert(&db_tx).await?;
                }
            }

            if let Some(image_urls) = update.image_urls.as_deref() {
                diary_images::Entity::delete_many()
                    .filter(diary_images::Column::DiaryId.eq(diary_id))
                    .exec(&db_tx)
                    .await?;
                self.insert_diary_media(&db_tx, diary_id, image_urls, &[])
                    .await?;
            }
            if let Some(video_urls) = update.video_urls.as_deref() {
                diary_videos::Entity::delete_many()
                    .filter(diary_videos::Column::DiaryId.eq(diary_id))
                    .exec(&db_tx)
                    .await?;
                self.insert_diary_media(&db_tx, diary_id, &[], video_urls)
                    .await?;
            }

            Ok(Diary::from(model))
        })
    }

    /// Deletes a diary and every dependent row. Creator-only.
    pub async fn delete_diary(&self, diary_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_diary_exists(&db_tx, diary_id).await?;
            self.require_diary_creator(&db_tx, diary_id, user_id).await?;

            diary_tags::Entity::delete_many()
                .filter(diary_tags::Column::DiaryId.eq(diary_id))
                .exec(&db_tx)
                .await?;
            diary_images::Entity::delete_many()
                .filter(diary_images::Column::DiaryId.eq(diary_id))
                .exec(&db_tx)
                .await?;
            diary_videos::Entity::delete_many()
                .filter(diary_videos::Column::DiaryId.eq(diary_id))
                .exec(&db_tx)
                .await?;
            diary_likes::Entity::delete_many()
                .filter(diary_likes::Column::DiaryId.eq(diary_id))
                .exec(&db_tx)
                .await?;
            diary_permissions::Entity::delete_many()
                .filter(diary_permissions::Column::DiaryId.eq(diary_id))
                .exec(&db_tx)
                .await?;
            diary_users::Entity::delete_many()
                .filter(diary_users::Column::DiaryId.eq(diary_id))
                .exec(&db_tx)
                .await?;
            diaries::Entity::delete_by_id(diary_id).exec(&db_tx).await?;

            Ok(())
        })
    }

    /// Shares a diary with another user.
    ///
    /// Any current associate may share, unlike account books where only the
    /// administrator grants access. Sharing with a user who already holds an
    /// association reports [`EngineError::AlreadyGranted`], which callers
    /// surface as informational.
    pub async fn share_diary(
        &self,
        diary_id: Uuid,
        granter_id: Uuid,
        grantee_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_diary_exists(&db_tx, diary_id).await?;
            self.require_diary_access(&db_tx, diary_id, granter_id)
                .await?;
            self.require_user_exists(&db_tx, grantee_id).await?;

            if self
                .diary_association_exists(&db_tx, diary_id, grantee_id)
                .await?
            {
                return Err(EngineError::AlreadyGranted(
                    "user already has access to this diary".to_string(),
                ));
            }

            let association = diary_users::ActiveModel {
                seq: ActiveValue::NotSet,
                diary_id: ActiveValue::Set(diary_id),
                user_id: ActiveValue::Set(grantee_id),
                created_at: ActiveValue::Set(Utc::now()),
            };
            association.insert(&db_tx).await?;

            Ok(())
        })
    }

    async fn insert_diary_media(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        diary_id: Uuid,
        image_urls: &[String],
        video_urls: &[String],
    ) -> ResultEngine<()> {
        for url in image_urls {
            let Some(url) = normalize_optional_text(Some(url.as_str())) else {
                continue;
            };
            let image = diary_images::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                diary_id: ActiveValue::Set(diary_id),
                image_url: ActiveValue::Set(url),
            };
            image.insert(db_tx).await?;
        }
        for url in video_urls {
            let Some(url) = normalize_optional_text(Some(url.as_str())) else {
                continue;
            };
            let video = diary_videos::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                diary_id: ActiveValue::Set(diary_id),
                video_url: ActiveValue::Set(url),
            };
            video.insert(db_tx).await?;
        }
        Ok(())
    }
}
