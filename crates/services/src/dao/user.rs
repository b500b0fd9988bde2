use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use cohort_db::models::{User, UserAlias, UserRole};

use super::base::{BaseDao, DaoError, DaoResult};
use crate::attendance::{normalize_email, IdentityDirectory};

pub struct UserDao {
    pub base: BaseDao<User>,
    pub aliases: BaseDao<UserAlias>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
            aliases: BaseDao::new(db, UserAlias::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        email: &str,
        display_name: String,
        role: UserRole,
    ) -> DaoResult<User> {
        let email = normalize_email(email)
            .ok_or_else(|| DaoError::Validation("Email must not be empty".to_string()))?;
        let now = DateTime::now();
        let user = User {
            id: None,
            email,
            display_name,
            role,
            cohort_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn is_admin(&self, user_id: ObjectId) -> DaoResult<bool> {
        let user = self
            .base
            .find_one(doc! { "_id": user_id, "deleted_at": null })
            .await?;
        Ok(matches!(user, Some(u) if u.role == UserRole::Admin))
    }

    pub async fn list_aliases(&self, user_id: ObjectId) -> DaoResult<Vec<UserAlias>> {
        self.aliases
            .find_many(doc! { "user_id": user_id }, Some(doc! { "created_at": 1 }))
            .await
    }

    /// Registers `email` as an alternate address of `user_id`.
    pub async fn add_alias(&self, user_id: ObjectId, email: &str) -> DaoResult<UserAlias> {
        let email = normalize_email(email)
            .ok_or_else(|| DaoError::Validation("Email must not be empty".to_string()))?;

        let owner = self.base.find_by_id(user_id).await?;
        if owner.deleted_at.is_some() {
            return Err(DaoError::NotFound);
        }
        if self.base.count(doc! { "email": &email }).await? > 0 {
            return Err(DaoError::Validation(format!(
                "{} is already a primary account email",
                email
            )));
        }

        let alias = UserAlias {
            id: None,
            user_id,
            email,
            created_at: DateTime::now(),
        };
        let id = self.aliases.insert_one(&alias).await?;
        self.aliases.find_by_id(id).await
    }

    pub async fn remove_alias(&self, user_id: ObjectId, alias_id: ObjectId) -> DaoResult<bool> {
        let deleted = self
            .aliases
            .hard_delete(doc! { "_id": alias_id, "user_id": user_id })
            .await?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl IdentityDirectory for UserDao {
    async fn resolve_user_by_email(&self, email: &str) -> DaoResult<Option<ObjectId>> {
        let user = self
            .base
            .find_one(doc! { "email": email, "deleted_at": null })
            .await?;
        Ok(user.and_then(|u| u.id))
    }

    async fn resolve_user_by_alias(&self, email: &str) -> DaoResult<Option<ObjectId>> {
        let Some(alias) = self.aliases.find_one(doc! { "email": email }).await? else {
            return Ok(None);
        };
        // Aliases of removed accounts do not resolve.
        let active = self
            .base
            .count(doc! { "_id": alias.user_id, "deleted_at": null })
            .await?;
        Ok((active > 0).then_some(alias.user_id))
    }
}
