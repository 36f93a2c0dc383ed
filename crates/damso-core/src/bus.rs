//! Event-bus trait seam for the live stream channel.
//!
//! Any backbone satisfying this interface is conformant: native database
//! pub/sub, an in-memory broadcast for single-process deployments, or an
//! external broker. Implementations live in `damso-realtime`.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::result::AppResult;

/// Publish/subscribe capability used to signal new notifications to
/// open client connections.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a payload on a named channel. Delivery is best-effort:
    /// a channel with no subscribers accepts the publish and drops it.
    async fn publish(&self, channel: &str, payload: &str) -> AppResult<()>;

    /// Subscribe to a named channel. The returned subscription owns the
    /// underlying resource and releases it when dropped.
    async fn subscribe(&self, channel: &str) -> AppResult<BusSubscription>;
}

/// A live subscription to one bus channel.
///
/// Owns exactly one backing resource; the release hook runs exactly once,
/// on drop, so repeated connect/disconnect cycles cannot leak.
pub struct BusSubscription {
    receiver: broadcast::Receiver<String>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl BusSubscription {
    /// Wrap a broadcast receiver together with its release hook.
    pub fn new(
        receiver: broadcast::Receiver<String>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Receive the next payload published on the channel.
    ///
    /// A `Lagged` error means this subscriber fell behind the broadcast
    /// buffer; callers should skip and keep receiving. `Closed` means the
    /// bus side is gone and the stream should end.
    pub async fn recv(&mut self) -> Result<String, broadcast::error::RecvError> {
        self.receiver.recv().await
    }
}

impl std::fmt::Debug for BusSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusSubscription")
            .field("released", &self.release.is_none())
            .finish()
    }
}

impl Drop for BusSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
