//! Users repository
//!
//! Emails are compared case-insensitively.

use async_trait::async_trait;
use chrono::Utc;

use super::{MemoryRepository, Repository};
use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

#[async_trait]
pub trait UsersStore: Send + Sync {
    async fn users_get_by_id(&self, id: i32) -> AppResult<User>;
    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn users_email_exists(&self, email: &str) -> AppResult<bool>;
    async fn users_create(&self, email: &str, password_hash: &str) -> AppResult<User>;
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("User {} not found", id))
}

#[async_trait]
impl UsersStore for Repository {
    async fn users_get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn users_email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn users_create(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl UsersStore for MemoryRepository {
    async fn users_get_by_id(&self, id: i32) -> AppResult<User> {
        let tables = self.tables.read().await;
        tables.users.get(id).ok_or_else(|| not_found(id))
    }

    async fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn users_email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.users_get_by_email(email).await?.is_some())
    }

    async fn users_create(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .rows
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        let user = User {
            user_id: tables.users.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.rows.insert(user.user_id, user.clone());
        Ok(user)
    }
}
