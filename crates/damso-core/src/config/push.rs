//! Web Push delivery configuration.
//!
//! VAPID material is passed in explicitly at construction time instead of
//! living in process-global state, so tests can run with fake keys.

use serde::{Deserialize, Serialize};

/// Web Push (VAPID) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether push delivery is attempted at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// ES256 VAPID private key, PEM-encoded.
    #[serde(default)]
    pub vapid_private_key_pem: String,
    /// VAPID `sub` claim, e.g. `mailto:admin@damso.example`.
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Notification title shown by the browser.
    #[serde(default = "default_title")]
    pub title: String,
    /// Icon URL included in the payload.
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Badge URL included in the payload.
    #[serde(default = "default_badge")]
    pub badge: String,
    /// TTL in seconds handed to the push service.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u32,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            vapid_private_key_pem: String::new(),
            subject: default_subject(),
            title: default_title(),
            icon: default_icon(),
            badge: default_badge(),
            ttl_seconds: default_ttl(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_subject() -> String {
    "mailto:admin@damso.example".to_string()
}

fn default_title() -> String {
    "담소".to_string()
}

fn default_icon() -> String {
    "/icons/icon-192.png".to_string()
}

fn default_badge() -> String {
    "/icons/badge-72.png".to_string()
}

fn default_ttl() -> u32 {
    86400
}
