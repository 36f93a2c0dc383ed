//! Notification handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};

use damso_core::error::AppError;
use damso_entity::notification::kind::NotificationKind;
use damso_service::dispatch::DispatchRequest;
use damso_service::notification::FeedItem;

use crate::dto::request::{CreateNotificationRequest, FeedQuery, MarkReadRequest};
use crate::dto::response::{
    ApiResponse, CountResponse, CreateNotificationResponse, CreatedNotification, UpdatedResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// POST /api/notifications
///
/// Trigger endpoint called by the forum backend after a domain event's
/// primary write. Any authenticated caller may trigger; the identity in
/// the notification comes from the body, not the token.
pub async fn create_notification(
    State(state): State<AppState>,
    _auth: AuthUser,
    body: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> Result<Json<CreateNotificationResponse>, ApiError> {
    let Json(req) = body?;
    let kind = NotificationKind::parse(&req.kind)
        .ok_or_else(|| AppError::validation(format!("Unknown notification type '{}'", req.kind)))?;

    let notification = state
        .dispatcher
        .dispatch(DispatchRequest {
            receiver_id: req.receiver_id,
            sender_id: req.sender_id,
            kind,
            post_id: req.post_id,
            comment_id: req.comment_id,
            content: req.content,
        })
        .await?;

    Ok(Json(CreateNotificationResponse {
        success: true,
        notification: CreatedNotification {
            id: notification.id,
            kind: notification.kind,
            created_at: notification.created_at,
        },
    }))
}

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<FeedItem>>>, ApiError> {
    if query.limit.is_some_and(|l| l <= 0) {
        return Err(AppError::validation("limit must be positive").into());
    }

    let items = state
        .notification_service
        .feed(auth.user_id, query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/notifications/unread-count
///
/// Anonymous callers get `{count: 0}`, not an error, so the frontend can
/// poll the badge without a login check.
pub async fn unread_count(
    State(state): State<AppState>,
    maybe: MaybeAuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = match maybe.0 {
        Some(ctx) => state.notification_service.unread_count(ctx.user_id).await?,
        None => 0,
    };
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PATCH /api/notifications/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<MarkReadRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UpdatedResponse>>, ApiError> {
    let Json(req) = body?;
    let updated = state
        .notification_service
        .mark_read(auth.user_id, &req.notification_ids)
        .await?;
    Ok(Json(ApiResponse::ok(UpdatedResponse { updated })))
}
