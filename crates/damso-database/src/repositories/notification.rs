//! Notification repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use damso_core::error::{AppError, ErrorKind};
use damso_core::result::AppResult;
use damso_entity::notification::kind::NotificationKind;
use damso_entity::notification::model::Notification;

/// Fields for a new notification row.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Receiving user.
    pub receiver_id: i64,
    /// Acting user.
    pub sender_id: i64,
    /// Validated kind.
    pub kind: NotificationKind,
    /// Post involved, if any.
    pub post_id: Option<i64>,
    /// Comment involved, if any.
    pub comment_id: Option<i64>,
    /// Optional free-text content.
    pub content: Option<String>,
}

/// Repository for notification rows.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification. The row starts unread.
    ///
    /// A foreign-key violation (receiver or sender does not exist) is
    /// reported as a validation error, everything else as a database error.
    pub async fn create(&self, new: &NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (receiver_id, sender_id, kind, post_id, comment_id, content) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(new.receiver_id)
        .bind(new.sender_id)
        .bind(new.kind.as_str())
        .bind(new.post_id)
        .bind(new.comment_id)
        .bind(new.content.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::validation("Receiver or sender does not exist")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
            }
        })
    }

    /// Feed for a user: every unread notification regardless of age, plus
    /// read ones from the last 7 days, newest first. A NULL limit means
    /// no limit.
    pub async fn find_feed(
        &self,
        receiver_id: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE receiver_id = $1 \
               AND (is_read = FALSE OR created_at >= NOW() - INTERVAL '7 days') \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2",
        )
        .bind(receiver_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, receiver_id: i64) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE receiver_id = $1 AND is_read = FALSE",
        )
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Mark the given notifications as read, scoped to the receiver.
    ///
    /// Ids belonging to another user are silently skipped, and rows that
    /// are already read keep their original `read_at` (idempotent).
    /// Returns the number of rows that transitioned.
    pub async fn mark_read(
        &self,
        receiver_id: i64,
        ids: &[i64],
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = $3 \
             WHERE receiver_id = $1 AND id = ANY($2) AND is_read = FALSE",
        )
        .bind(receiver_id)
        .bind(ids.to_vec())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;

        Ok(result.rows_affected())
    }
}

/// Whether a sqlx error is a PostgreSQL foreign-key violation (23503).
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23503")
}
