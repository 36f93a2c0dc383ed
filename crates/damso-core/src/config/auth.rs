//! Token validation configuration.
//!
//! Session issuance lives in the forum application; this service only
//! validates bearer tokens minted there.

use serde::{Deserialize, Serialize};

/// JWT validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret.
    pub jwt_secret: String,
    /// Accepted clock skew in seconds when validating `exp`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    30
}
