use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, account_book_users, account_books, diaries, diary_users, tags,
    users,
};

use super::Engine;

/// Generates `_association_exists` and `require_` access gates for a
/// shareable resource's join table.
macro_rules! impl_association_checks {
    ($exists_fn:ident, $require_fn:ident, $entity:path, $resource_col:expr, $user_col:expr, $err_msg:literal) => {
        pub(super) async fn $exists_fn(
            &self,
            db: &DatabaseTransaction,
            resource_id: Uuid,
            user_id: Uuid,
        ) -> ResultEngine<bool> {
            <$entity>::find()
                .filter($resource_col.eq(resource_id))
                .filter($user_col.eq(user_id))
                .one(db)
                .await
                .map(|row| row.is_some())
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            resource_id: Uuid,
            user_id: Uuid,
        ) -> ResultEngine<()> {
            if !self.$exists_fn(db, resource_id, user_id).await? {
                return Err(EngineError::Forbidden($err_msg.to_string()));
            }
            Ok(())
        }
    };
}

impl Engine {
    impl_association_checks!(
        diary_association_exists,
        require_diary_access,
        diary_users::Entity,
        diary_users::Column::DiaryId,
        diary_users::Column::UserId,
        "no access to this diary"
    );

    impl_association_checks!(
        ledger_association_exists,
        require_ledger_access,
        account_book_users::Entity,
        account_book_users::Column::AccountBookId,
        account_book_users::Column::UserId,
        "no access to this account book"
    );

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("user".to_string()))
    }

    pub(super) async fn require_diary_exists(
        &self,
        db: &DatabaseTransaction,
        diary_id: Uuid,
    ) -> ResultEngine<diaries::Model> {
        diaries::Entity::find_by_id(diary_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("diary".to_string()))
    }

    pub(super) async fn require_account_book_exists(
        &self,
        db: &DatabaseTransaction,
        book_id: Uuid,
    ) -> ResultEngine<account_books::Model> {
        account_books::Entity::find_by_id(book_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("account book".to_string()))
    }

    /// Checks that every id in a (deduplicated) tag set exists.
    pub(super) async fn require_tags_exist(
        &self,
        db: &DatabaseTransaction,
        tag_ids: &[Uuid],
    ) -> ResultEngine<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let found = tags::Entity::find()
            .filter(tags::Column::Id.is_in(tag_ids.iter().copied()))
            .count(db)
            .await?;
        if found as usize != tag_ids.len() {
            return Err(EngineError::NotFound("tag".to_string()));
        }
        Ok(())
    }

    /// Resolves the diary's creator: the holder of the earliest association
    /// row (minimum `seq`).
    pub(super) async fn diary_creator(
        &self,
        db: &DatabaseTransaction,
        diary_id: Uuid,
    ) -> ResultEngine<Uuid> {
        let row = diary_users::Entity::find()
            .filter(diary_users::Column::DiaryId.eq(diary_id))
            .order_by_asc(diary_users::Column::Seq)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("diary".to_string()))?;
        Ok(row.user_id)
    }

    pub(super) async fn require_diary_creator(
        &self,
        db: &DatabaseTransaction,
        diary_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        if self.diary_creator(db, diary_id).await? != user_id {
            return Err(EngineError::Forbidden(
                "only the creator may delete a diary".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the book's administrator: the holder of the earliest
    /// association row (minimum `seq`).
    pub(super) async fn ledger_admin(
        &self,
        db: &DatabaseTransaction,
        book_id: Uuid,
    ) -> ResultEngine<Uuid> {
        let row = account_book_users::Entity::find()
            .filter(account_book_users::Column::AccountBookId.eq(book_id))
            .order_by_asc(account_book_users::Column::Seq)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("account book".to_string()))?;
        Ok(row.user_id)
    }

    pub(super) async fn require_ledger_admin(
        &self,
        db: &DatabaseTransaction,
        book_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<()> {
        if self.ledger_admin(db, book_id).await? != user_id {
            return Err(EngineError::Forbidden(
                "only the administrator may manage this account book".to_string(),
            ));
        }
        Ok(())
    }
}
