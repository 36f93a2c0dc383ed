//! Push subscription (delivery endpoint) repository.
//!
//! Enforces the single-device design: at most one stored endpoint per
//! user, and `users.notification_enabled` mirrors "has an endpoint".

use sqlx::PgPool;

use damso_core::error::{AppError, ErrorKind};
use damso_core::result::AppResult;
use damso_entity::push::PushSubscription;

/// Repository for push subscription rows.
#[derive(Debug, Clone)]
pub struct PushSubscriptionRepository {
    pool: PgPool,
}

impl PushSubscriptionRepository {
    /// Create a new push subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register an endpoint for a user, replacing any prior endpoint.
    ///
    /// Runs as a single transaction so a concurrent read never observes
    /// zero or two rows for the user: delete existing rows, upsert the
    /// new endpoint (an endpoint re-registered from another account moves
    /// to this user), and set `notification_enabled`.
    pub async fn replace_for_user(
        &self,
        user_id: i64,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> AppResult<PushSubscription> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM push_subscriptions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear prior endpoints", e)
            })?;

        let subscription = sqlx::query_as::<_, PushSubscription>(
            "INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (endpoint) DO UPDATE \
                 SET user_id = EXCLUDED.user_id, \
                     p256dh = EXCLUDED.p256dh, \
                     auth = EXCLUDED.auth, \
                     created_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(endpoint)
        .bind(p256dh)
        .bind(auth)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to register endpoint", e)
        })?;

        sqlx::query("UPDATE users SET notification_enabled = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to enable notifications", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit subscription", e)
        })?;

        Ok(subscription)
    }

    /// Delete an endpoint wherever it is registered.
    ///
    /// Returns the owning user id, or `None` when the endpoint was not
    /// registered to anyone. When the owner's last endpoint goes away,
    /// `notification_enabled` is cleared in the same transaction.
    pub async fn delete_by_endpoint(&self, endpoint: &str) -> AppResult<Option<i64>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let owner: Option<i64> = sqlx::query_scalar(
            "DELETE FROM push_subscriptions WHERE endpoint = $1 RETURNING user_id",
        )
        .bind(endpoint)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete endpoint", e)
        })?;

        if let Some(user_id) = owner {
            sqlx::query(
                "UPDATE users SET notification_enabled = \
                     EXISTS(SELECT 1 FROM push_subscriptions WHERE user_id = $1) \
                 WHERE id = $1",
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to refresh enabled flag", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit endpoint removal", e)
        })?;

        Ok(owner)
    }

    /// The user's registered endpoint, if any (0 or 1 by invariant).
    pub async fn find_by_user(&self, user_id: i64) -> AppResult<Option<PushSubscription>> {
        sqlx::query_as::<_, PushSubscription>(
            "SELECT * FROM push_subscriptions WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find endpoint", e))
    }

    /// Whether the user both has an endpoint row and has notifications
    /// enabled. The two should agree; the conjunction is the contract.
    pub async fn has_active_subscription(&self, user_id: i64) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                 SELECT 1 FROM push_subscriptions s \
                 JOIN users u ON u.id = s.user_id \
                 WHERE s.user_id = $1 AND u.notification_enabled \
             )",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check subscription", e)
        })
    }
}
