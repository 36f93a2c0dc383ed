//! Push subscription handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::dto::request::{SubscribeRequest, UnsubscribeRequest};
use crate::dto::response::{ApiResponse, SubscriptionStatusResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/push/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SubscriptionStatusResponse>>, ApiError> {
    let Json(req) = body?;
    state
        .subscription_service
        .subscribe(
            auth.user_id,
            &req.subscription.endpoint,
            &req.subscription.keys.p256dh,
            &req.subscription.keys.auth,
        )
        .await?;

    Ok(Json(ApiResponse::ok(SubscriptionStatusResponse {
        has_subscription: true,
    })))
}

/// POST /api/push/unsubscribe
///
/// 404 when the endpoint is registered to no one.
pub async fn unsubscribe(
    State(state): State<AppState>,
    _auth: AuthUser,
    body: Result<Json<UnsubscribeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SubscriptionStatusResponse>>, ApiError> {
    let Json(req) = body?;
    state.subscription_service.unsubscribe(&req.endpoint).await?;

    Ok(Json(ApiResponse::ok(SubscriptionStatusResponse {
        has_subscription: false,
    })))
}

/// GET /api/push/status
pub async fn status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SubscriptionStatusResponse>, ApiError> {
    let has_subscription = state.subscription_service.status(auth.user_id).await?;
    Ok(Json(SubscriptionStatusResponse { has_subscription }))
}
