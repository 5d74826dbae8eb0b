use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, User, users};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

/// Partial profile update; `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UserProfileUpdate {
    pub user_name: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
}

impl Engine {
    /// Resolves a verified external identity to the internal user, creating
    /// the user on first login.
    ///
    /// The `(provider, subject)` pair is immutable once written; repeated
    /// logins always resolve to the same user.
    pub async fn resolve_or_create_user(
        &self,
        provider: &str,
        subject: &str,
    ) -> ResultEngine<User> {
        let provider = normalize_required_text(provider, "identity provider")?;
        let subject = normalize_required_text(subject, "identity subject")?;

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Provider.eq(provider.as_str()))
                .filter(users::Column::Subject.eq(subject.as_str()))
                .one(&db_tx)
                .await?;

            let model = match existing {
                Some(model) => model,
                None => {
                    let id = Uuid::new_v4();
                    let now = Utc::now();
                    let active = users::ActiveModel {
                        id: ActiveValue::Set(id),
                        provider: ActiveValue::Set(provider.clone()),
                        subject: ActiveValue::Set(subject.clone()),
                        user_name: ActiveValue::Set(format!("user-{id}")),
                        avatar: ActiveValue::Set(None),
                        email: ActiveValue::Set(None),
                        created_at: ActiveValue::Set(now),
                        updated_at: ActiveValue::Set(now),
                    };
                    active.insert(&db_tx).await?
                }
            };

            Ok(User::from(model))
        })
    }

    /// Return a user by id.
    pub async fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user_exists(&db_tx, user_id).await?;
            Ok(User::from(model))
        })
    }

    /// Updates the mutable profile columns; the identity pair stays as is.
    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        update: UserProfileUpdate,
    ) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let mut active = users::ActiveModel {
                id: ActiveValue::Set(user_id),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(user_name) = update.user_name.as_deref() {
                active.user_name =
                    ActiveValue::Set(normalize_required_text(user_name, "user name")?);
            }
            if let Some(avatar) = update.avatar.as_deref() {
                active.avatar = ActiveValue::Set(normalize_optional_text(Some(avatar)));
            }
            if let Some(email) = update.email.as_deref() {
                active.email = ActiveValue::Set(normalize_optional_text(Some(email)));
            }

            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }
}
