use chrono::Utc;
use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    AccountBook, EngineError, ResultEngine, User, account_book_users, account_books, bill_tags,
    bills, users,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Creates an account book with its first association, atomically.
    ///
    /// The creator becomes the administrator: the holder of the earliest
    /// association row.
    pub async fn create_account_book(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> ResultEngine<AccountBook> {
        let name = normalize_required_text(name, "account book name")?;

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let now = Utc::now();
            let book = account_books::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name.clone()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let model = book.insert(&db_tx).await?;

            let association = account_book_users::ActiveModel {
                seq: ActiveValue::NotSet,
                account_book_id: ActiveValue::Set(model.id),
                user_id: ActiveValue::Set(user_id),
                created_at: ActiveValue::Set(now),
            };
            association.insert(&db_tx).await?;

            Ok(AccountBook::from(model))
        })
    }

    /// Return an account book the caller is associated with.
    pub async fn account_book(&self, book_id: Uuid, user_id: Uuid) -> ResultEngine<AccountBook> {
        with_tx!(self, |db_tx| {
            let model = self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_access(&db_tx, book_id, user_id).await?;
            Ok(AccountBook::from(model))
        })
    }

    /// Lists every account book the user holds an association with.
    pub async fn list_account_books(&self, user_id: Uuid) -> ResultEngine<Vec<AccountBook>> {
        with_tx!(self, |db_tx| {
            let models = account_books::Entity::find()
                .join(
                    JoinType::InnerJoin,
                    account_books::Relation::AccountBookUsers.def(),
                )
                .filter(account_book_users::Column::UserId.eq(user_id))
                .order_by_desc(account_books::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(AccountBook::from).collect())
        })
    }

    /// Renames an account book. Administrator-only.
    pub async fn rename_account_book(
        &self,
        book_id: Uuid,
        user_id: Uuid,
        name: &str,
    ) -> ResultEngine<AccountBook> {
        let name = normalize_required_text(name, "account book name")?;

        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_admin(&db_tx, book_id, user_id).await?;

            let active = account_books::ActiveModel {
                id: ActiveValue::Set(book_id),
                name: ActiveValue::Set(name.clone()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(AccountBook::from(model))
        })
    }

    /// Deletes an account book with its associations, bills and their tag
    /// links. Administrator-only.
    pub async fn delete_account_book(&self, book_id: Uuid, user_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_admin(&db_tx, book_id, user_id).await?;

            let bill_ids: Vec<Uuid> = bills::Entity::find()
                .filter(bills::Column::AccountBookId.eq(book_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|bill| bill.id)
                .collect();
            if !bill_ids.is_empty() {
                bill_tags::Entity::delete_many()
                    .filter(bill_tags::Column::BillId.is_in(bill_ids))
                    .exec(&db_tx)
                    .await?;
            }
            bills::Entity::delete_many()
                .filter(bills::Column::AccountBookId.eq(book_id))
                .exec(&db_tx)
                .await?;
            account_book_users::Entity::delete_many()
                .filter(account_book_users::Column::AccountBookId.eq(book_id))
                .exec(&db_tx)
                .await?;
            account_books::Entity::delete_by_id(book_id)
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }

    /// Grants another user access to an account book.
    ///
    /// Administrator-only, stricter than diary sharing. Granting to a user
    /// who already holds an association reports
    /// [`EngineError::AlreadyGranted`], which callers surface as
    /// informational.
    pub async fn grant_ledger_access(
        &self,
        book_id: Uuid,
        granter_id: Uuid,
        grantee_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_admin(&db_tx, book_id, granter_id)
                .await?;
            self.require_user_exists(&db_tx, grantee_id).await?;

            if self
                .ledger_association_exists(&db_tx, book_id, grantee_id)
                .await?
            {
                return Err(EngineError::AlreadyGranted(
                    "user already has access to this account book".to_string(),
                ));
            }

            let association = account_book_users::ActiveModel {
                seq: ActiveValue::NotSet,
                account_book_id: ActiveValue::Set(book_id),
                user_id: ActiveValue::Set(grantee_id),
                created_at: ActiveValue::Set(Utc::now()),
            };
            association.insert(&db_tx).await?;

            Ok(())
        })
    }

    /// Revokes a user's access to an account book. Administrator-only.
    ///
    /// The administrator's own association cannot be revoked; a book always
    /// keeps at least its first association.
    pub async fn revoke_ledger_access(
        &self,
        book_id: Uuid,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_admin(&db_tx, book_id, requester_id)
                .await?;

            if target_user_id == requester_id {
                return Err(EngineError::InvalidArgument(
                    "cannot revoke the administrator".to_string(),
                ));
            }

            let deleted = account_book_users::Entity::delete_many()
                .filter(account_book_users::Column::AccountBookId.eq(book_id))
                .filter(account_book_users::Column::UserId.eq(target_user_id))
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::NotFound("association".to_string()));
            }

            Ok(())
        })
    }

    /// Lists the users associated with an account book, administrator first.
    pub async fn list_account_book_users(
        &self,
        book_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<Vec<User>> {
        with_tx!(self, |db_tx| {
            self.require_account_book_exists(&db_tx, book_id).await?;
            self.require_ledger_access(&db_tx, book_id, user_id).await?;

            let models = users::Entity::find()
                .join(JoinType::InnerJoin, users::Relation::AccountBookUsers.def())
                .filter(account_book_users::Column::AccountBookId.eq(book_id))
                .order_by_asc(account_book_users::Column::Seq)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(User::from).collect())
        })
    }
}
