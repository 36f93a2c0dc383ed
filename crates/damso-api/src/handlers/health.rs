//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match damso_database::connection::health_check(&state.db_pool).await {
        Ok(true) => Ok(Json(HealthResponse {
            status: "ok".to_string(),
            database: "up".to_string(),
        })),
        _ => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded".to_string(),
                database: "down".to_string(),
            }),
        )),
    }
}
