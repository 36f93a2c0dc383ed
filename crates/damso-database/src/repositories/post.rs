//! Post directory lookups for deep-link construction.

use std::collections::HashMap;

use sqlx::PgPool;

use damso_core::error::{AppError, ErrorKind};
use damso_core::result::AppResult;

/// Read-only repository over the collaborator `posts` table.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Board slug for a post, if the post still exists.
    pub async fn board_slug(&self, post_id: i64) -> AppResult<Option<String>> {
        sqlx::query_scalar("SELECT board_slug FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve board", e))
    }

    /// Resolve board slugs for a set of post ids. Missing ids are simply
    /// absent from the map.
    pub async fn board_slugs(&self, post_ids: &[i64]) -> AppResult<HashMap<i64, String>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, board_slug FROM posts WHERE id = ANY($1)")
                .bind(post_ids.to_vec())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to resolve boards", e)
                })?;

        Ok(rows.into_iter().collect())
    }
}
