//! Request DTOs.
//!
//! Field casing mirrors the forum frontend: trigger payloads are
//! snake_case with the kind under `type`; the browser-facing push and
//! read endpoints use the camelCase names the Web APIs produce.

use serde::Deserialize;

/// POST /api/notifications body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotificationRequest {
    /// Receiving user id.
    pub receiver_id: i64,
    /// Acting user id.
    pub sender_id: i64,
    /// Notification kind name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Post involved, if any.
    #[serde(default)]
    pub post_id: Option<i64>,
    /// Comment involved, if any.
    #[serde(default)]
    pub comment_id: Option<i64>,
    /// Optional free-text content.
    #[serde(default)]
    pub content: Option<String>,
}

/// PATCH /api/notifications/read body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    /// Ids to mark read.
    pub notification_ids: Vec<i64>,
}

/// POST /api/push/subscribe body, as produced by
/// `PushSubscription.toJSON()` in the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub subscription: SubscriptionPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionPayload {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// POST /api/push/unsubscribe body.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

/// GET /api/notifications query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedQuery {
    /// Maximum number of items; absent means the full feed window.
    pub limit: Option<i64>,
}

/// GET /api/notifications/stream query parameters.
///
/// `EventSource` cannot set headers, so the stream accepts the bearer
/// token as a query parameter as well.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamQuery {
    pub token: Option<String>,
}
