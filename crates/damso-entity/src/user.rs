//! Minimal collaborator user model.
//!
//! The user directory is owned by the forum application; this service only
//! reads the columns the notification pipeline needs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Forum user, as seen by the notification service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Display nickname used in classified messages.
    pub nickname: String,
    /// Kept consistent with "has at least one push endpoint".
    pub notification_enabled: bool,
}
