//! Per-request caller context.

/// Authenticated caller identity, decoded from the bearer token by the
/// API layer and threaded into services.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Authenticated user id.
    pub user_id: i64,
    /// Display nickname carried in the token.
    pub nickname: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: i64, nickname: impl Into<String>) -> Self {
        Self {
            user_id,
            nickname: nickname.into(),
        }
    }
}
