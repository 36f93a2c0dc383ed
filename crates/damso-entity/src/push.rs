//! Push subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One browser installation registered to receive push messages.
///
/// The endpoint URL is globally unique (it identifies exactly one browser
/// installation), and at most one row exists per user: registering a new
/// endpoint replaces the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PushSubscription {
    /// Unique subscription identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Vendor push-service URL for this browser installation.
    pub endpoint: String,
    /// Client public key for payload encryption (P-256, base64url).
    pub p256dh: String,
    /// Client auth secret for payload encryption (base64url).
    pub auth: String,
    /// When the subscription was registered.
    pub created_at: DateTime<Utc>,
}
