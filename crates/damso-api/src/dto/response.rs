//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: i64,
}

/// Rows-updated response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedResponse {
    /// Rows that transitioned.
    pub updated: u64,
}

/// POST /api/notifications response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationResponse {
    pub success: bool,
    pub notification: CreatedNotification,
}

/// Summary of a freshly created notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedNotification {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// GET /api/push/status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub has_subscription: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Database status.
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_camel_case() {
        let json = serde_json::to_value(SubscriptionStatusResponse {
            has_subscription: true,
        })
        .unwrap();
        assert_eq!(json["hasSubscription"], true);
    }

    #[test]
    fn created_notification_serializes_kind_as_type() {
        let json = serde_json::to_value(CreatedNotification {
            id: 7,
            kind: "reply".to_string(),
            created_at: Utc::now(),
        })
        .unwrap();
        assert_eq!(json["type"], "reply");
        assert!(json.get("kind").is_none());
    }
}
