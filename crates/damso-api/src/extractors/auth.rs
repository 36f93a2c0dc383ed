//! Bearer-token extractors.
//!
//! Tokens are minted by the forum application; this service only
//! validates the shared-secret signature and decodes the identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use damso_core::config::auth::AuthConfig;
use damso_core::error::{AppError, ErrorKind};
use damso_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims carried by forum-issued access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// Display nickname.
    pub nickname: String,
    /// Expiry (unix seconds).
    pub exp: u64,
}

/// Validate a bearer token and decode the caller identity.
pub fn decode_token(config: &AuthConfig, token: &str) -> Result<RequestContext, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway_seconds;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AppError::with_source(ErrorKind::Unauthorized, "Invalid or expired token", e))?;

    Ok(RequestContext::new(data.claims.sub, data.claims.nickname))
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
        let ctx = decode_token(&state.config.auth, token)?;
        Ok(AuthUser(ctx))
    }
}

/// Like [`AuthUser`] but tolerates an absent Authorization header.
///
/// A present-but-invalid token is still rejected; only "not logged in"
/// degrades to `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => Ok(MaybeAuthUser(Some(decode_token(&state.config.auth, token)?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
