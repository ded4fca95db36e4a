//! User repository: persistence of accounts and their credential state.
//!
//! Recovery-token lookups always go through the token hash plus a
//! non-expired check in SQL; raw tokens never reach the database.

use super::user::{NewUser, User, UserUpdate};
use super::{DbPool, SQL_NOW};
use crate::{Result, ServiceError};

/// Columns selected for every User row.
const USER_COLUMNS: &str = "id, name, email, password, role, is_active, is_email_verified, \
     email_verification_token, email_verification_expires_at, \
     password_reset_token, password_reset_expires_at, refresh_token, \
     created_at, updated_at";

/// Repository for user account operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user. The email is normalized to lowercase.
    ///
    /// Returns [`ServiceError::Conflict`] when the email is already taken.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new_user.name)
        .bind(new_user.email.to_lowercase())
        .bind(&new_user.password)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                ServiceError::Conflict("email already registered".into())
            } else {
                ServiceError::Database(e.to_string())
            }
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("user".into()))
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.to_lowercase())
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Find a user by password-reset token hash with an unexpired window.
    pub async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE password_reset_token = $1
               AND password_reset_expires_at > {SQL_NOW}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(token_hash)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Find a user by email-verification token hash with an unexpired window.
    pub async fn find_by_verification_token(&self, token_hash: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE email_verification_token = $1
               AND email_verification_expires_at > {SQL_NOW}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(token_hash)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Store the current refresh token for a user, replacing any prior one.
    pub async fn set_refresh_token(&self, id: i64, token: &str) -> Result<()> {
        let sql = format!(
            "UPDATE users SET refresh_token = $1, updated_at = {SQL_NOW} WHERE id = $2"
        );
        sqlx::query(&sql)
            .bind(token)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }

    /// Clear the stored refresh token. Idempotent.
    pub async fn clear_refresh_token(&self, id: i64) -> Result<()> {
        let sql = format!(
            "UPDATE users SET refresh_token = NULL, updated_at = {SQL_NOW} WHERE id = $1"
        );
        sqlx::query(&sql)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }

    /// Store a password-reset token hash and expiry, replacing any prior one.
    pub async fn set_reset_token(&self, id: i64, token_hash: &str, expires_at: &str) -> Result<()> {
        let sql = format!(
            "UPDATE users SET password_reset_token = $1, password_reset_expires_at = $2,
                              updated_at = {SQL_NOW}
             WHERE id = $3"
        );
        sqlx::query(&sql)
            .bind(token_hash)
            .bind(expires_at)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }

    /// Replace the password hash and consume the reset token in one step.
    pub async fn reset_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let sql = format!(
            "UPDATE users SET password = $1,
                              password_reset_token = NULL,
                              password_reset_expires_at = NULL,
                              updated_at = {SQL_NOW}
             WHERE id = $2"
        );
        sqlx::query(&sql)
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }

    /// Replace the password hash (authenticated password change).
    pub async fn set_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let sql = format!(
            "UPDATE users SET password = $1, updated_at = {SQL_NOW} WHERE id = $2"
        );
        sqlx::query(&sql)
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }

    /// Store an email-verification token hash and expiry, replacing any
    /// prior one.
    pub async fn set_verification_token(
        &self,
        id: i64,
        token_hash: &str,
        expires_at: &str,
    ) -> Result<()> {
        let sql = format!(
            "UPDATE users SET email_verification_token = $1,
                              email_verification_expires_at = $2,
                              updated_at = {SQL_NOW}
             WHERE id = $3"
        );
        sqlx::query(&sql)
            .bind(token_hash)
            .bind(expires_at)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }

    /// Mark the email verified and consume the verification token.
    pub async fn mark_email_verified(&self, id: i64) -> Result<()> {
        let sql = format!(
            "UPDATE users SET is_email_verified = $1,
                              email_verification_token = NULL,
                              email_verification_expires_at = NULL,
                              updated_at = {SQL_NOW}
             WHERE id = $2"
        );
        sqlx::query(&sql)
            .bind(true)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(())
    }

    /// Apply a partial update.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut sets: Vec<String> = Vec::new();
        if update.name.is_some() {
            sets.push(format!("name = ${}", sets.len() + 1));
        }
        if update.role.is_some() {
            sets.push(format!("role = ${}", sets.len() + 1));
        }
        if update.is_active.is_some() {
            sets.push(format!("is_active = ${}", sets.len() + 1));
        }
        let id_index = sets.len() + 1;
        let sql = format!(
            "UPDATE users SET {}, updated_at = {SQL_NOW} WHERE id = ${id_index}",
            sets.join(", ")
        );

        let mut query = sqlx::query(&sql);
        if let Some(ref name) = update.name {
            query = query.bind(name);
        }
        if let Some(role) = update.role {
            query = query.bind(role.as_str());
        }
        if let Some(is_active) = update.is_active {
            query = query.bind(is_active);
        }
        query = query.bind(id);

        query
            .execute(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        self.find_by_id(id).await
    }

    /// Count all users.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(count as u64)
    }

    /// List users, newest first, paginated (1-based page).
    pub async fn list(&self, page: u32, limit: u32) -> Result<Vec<User>> {
        let page = page.max(1);
        let offset = (page - 1) as i64 * limit as i64;

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit as i64)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        Ok(users)
    }
}
