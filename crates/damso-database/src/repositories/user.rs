//! User directory lookups.
//!
//! The user table is owned by the forum application; this repository only
//! resolves existence and nicknames for the notification pipeline.

use std::collections::HashMap;

use sqlx::PgPool;

use damso_core::error::{AppError, ErrorKind};
use damso_core::result::AppResult;
use damso_entity::user::User;

/// Read-only repository over the collaborator `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a user by id.
    pub async fn find_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, nickname, notification_enabled FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Resolve nicknames for a set of user ids. Missing ids are simply
    /// absent from the map.
    pub async fn nicknames(&self, user_ids: &[i64]) -> AppResult<HashMap<i64, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, nickname FROM users WHERE id = ANY($1)")
                .bind(user_ids.to_vec())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to resolve nicknames", e)
                })?;

        Ok(rows.into_iter().collect())
    }
}
