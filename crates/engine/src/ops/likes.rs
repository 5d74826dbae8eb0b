use chrono::Utc;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, diaries, diary_likes};

use super::{Engine, with_tx};

impl Engine {
    /// Records a like for `(diary, user)`.
    ///
    /// The like row and the counter increment are paired in one
    /// transaction; liking twice reports a conflict.
    pub async fn like_diary(&self, diary_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_diary_exists(&db_tx, diary_id).await?;

            let existing = diary_likes::Entity::find_by_id((diary_id, user_id))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::Conflict(
                    "diary already liked by this user".to_string(),
                ));
            }

            let like = diary_likes::ActiveModel {
                diary_id: ActiveValue::Set(diary_id),
                user_id: ActiveValue::Set(user_id),
                created_at: ActiveValue::Set(Utc::now()),
            };
            like.insert(&db_tx).await?;

            diaries::Entity::update_many()
                .col_expr(
                    diaries::Column::LikeCount,
                    Expr::col(diaries::Column::LikeCount).add(1),
                )
                .filter(diaries::Column::Id.eq(diary_id))
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }

    /// Removes a like for `(diary, user)`.
    ///
    /// The row delete and the counter decrement are paired in one
    /// transaction; the counter never goes below zero.
    pub async fn unlike_diary(&self, diary_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_diary_exists(&db_tx, diary_id).await?;

            let deleted = diary_likes::Entity::delete_by_id((diary_id, user_id))
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::Conflict(
                    "diary not liked by this user".to_string(),
                ));
            }

            diaries::Entity::update_many()
                .col_expr(
                    diaries::Column::LikeCount,
                    Expr::col(diaries::Column::LikeCount).sub(1),
                )
                .filter(diaries::Column::Id.eq(diary_id))
                .filter(diaries::Column::LikeCount.gt(0))
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }

    /// Whether a like row exists for `(diary, user)`.
    pub async fn has_liked(&self, diary_id: Uuid, user_id: Uuid) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            self.require_diary_exists(&db_tx, diary_id).await?;
            let count = diary_likes::Entity::find()
                .filter(diary_likes::Column::DiaryId.eq(diary_id))
                .filter(diary_likes::Column::UserId.eq(user_id))
                .count(&db_tx)
                .await?;
            Ok(count > 0)
        })
    }
}
