//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::kind::NotificationKind;

/// One fact to be surfaced to a receiving user.
///
/// Created when a triggering domain event completes its primary write;
/// mutated only to flip `is_read`/`read_at`; never deleted in normal
/// operation. `created_at` is immutable and defines feed order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique identifier, monotonic in creation order.
    pub id: i64,
    /// The user this notification is for.
    pub receiver_id: i64,
    /// The user whose action produced it.
    pub sender_id: i64,
    /// Storage name of the notification kind.
    pub kind: String,
    /// Post involved, if any.
    pub post_id: Option<i64>,
    /// Comment involved, if any.
    pub comment_id: Option<i64>,
    /// Optional free-text content.
    pub content: Option<String>,
    /// Whether the receiver has read this notification.
    pub is_read: bool,
    /// When it was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Typed kind, or `None` for a value outside the recognized set.
    /// Rows are validated at creation, so `None` only occurs for data
    /// written by an older or newer schema; readers fall back to the
    /// default classification instead of failing.
    pub fn kind(&self) -> Option<NotificationKind> {
        NotificationKind::parse(&self.kind)
    }
}
