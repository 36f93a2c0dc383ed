//! SSE live stream handler.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::StreamExt;
use tracing::debug;

use damso_core::error::AppError;
use damso_realtime::stream::user_notifications;

use crate::dto::request::StreamQuery;
use crate::error::ApiError;
use crate::extractors::auth::decode_token;
use crate::state::AppState;

/// GET /api/notifications/stream
///
/// One long-lived SSE connection per browser tab. `EventSource` cannot
/// set headers, so the token is accepted via `?token=` as well as the
/// Authorization header. Each frame is one serialized notification; the
/// keep-alive comment interval comes from configuration.
pub async fn notification_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let token = query
        .token
        .or_else(|| {
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(String::from)
        })
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
    let ctx = decode_token(&state.config.auth, &token)?;

    let subscription = state.bus.subscribe(&state.config.stream.channel).await?;
    debug!(user_id = ctx.user_id, "notification stream opened");

    let stream = user_notifications(subscription, ctx.user_id).filter_map(|notification| async move {
        match serde_json::to_string(&notification) {
            Ok(json) => Some(Ok(Event::default().event("notification").data(json))),
            Err(_) => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(state.config.stream.keepalive_seconds)),
    ))
}
