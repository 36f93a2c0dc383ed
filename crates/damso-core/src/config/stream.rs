//! Live stream (SSE) configuration.

use serde::{Deserialize, Serialize};

/// Event-bus backbone selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusProvider {
    /// In-process broadcast channels. Single-node only.
    Memory,
    /// PostgreSQL LISTEN/NOTIFY.
    Postgres,
}

/// Live stream channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Which event-bus backbone to use.
    #[serde(default = "default_provider")]
    pub provider: BusProvider,
    /// Bus channel name notifications are published on.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Broadcast buffer size per channel; slow subscribers past this lag
    /// skip messages rather than blocking publishers.
    #[serde(default = "default_buffer")]
    pub buffer_size: usize,
    /// SSE keep-alive comment interval in seconds.
    #[serde(default = "default_keepalive")]
    pub keepalive_seconds: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            channel: default_channel(),
            buffer_size: default_buffer(),
            keepalive_seconds: default_keepalive(),
        }
    }
}

fn default_provider() -> BusProvider {
    BusProvider::Postgres
}

fn default_channel() -> String {
    "damso_notifications".to_string()
}

fn default_buffer() -> usize {
    256
}

fn default_keepalive() -> u64 {
    15
}
