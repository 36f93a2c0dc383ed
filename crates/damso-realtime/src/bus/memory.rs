//! In-memory event bus for single-node deployments.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;

use damso_core::bus::{BusSubscription, EventBus};
use damso_core::result::AppResult;

/// Process-local bus over tokio broadcast channels.
///
/// Channels are created lazily on first subscribe and removed when the
/// last subscriber drops, so an idle process holds no channel state.
#[derive(Debug, Clone)]
pub struct MemoryBus {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Channel name to broadcast sender.
    channels: Mutex<HashMap<String, broadcast::Sender<String>>>,
    /// Buffer size for new channels.
    buffer_size: usize,
}

impl MemoryBus {
    /// Create a new in-memory bus.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                channels: Mutex::new(HashMap::new()),
                buffer_size,
            }),
        }
    }

    #[cfg(test)]
    fn channel_count(&self) -> usize {
        self.inner.channels.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl EventBus for MemoryBus {
    async fn publish(&self, channel: &str, payload: &str) -> AppResult<()> {
        let channels = self
            .inner
            .channels
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(tx) = channels.get(channel) {
            // Send only fails when every receiver is gone, which is the
            // same as publishing to an absent channel.
            let _ = tx.send(payload.to_string());
        }
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> AppResult<BusSubscription> {
        let receiver = {
            let mut channels = self
                .inner
                .channels
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            channels
                .entry(channel.to_string())
                .or_insert_with(|| broadcast::channel(self.inner.buffer_size).0)
                .subscribe()
        };

        // Weak so a lingering subscription does not keep a dropped bus
        // (and its senders) alive.
        let inner = Arc::downgrade(&self.inner);
        let name = channel.to_string();
        Ok(BusSubscription::new(receiver, move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut channels = inner.channels.lock().unwrap_or_else(|e| e.into_inner());
            // The dropping receiver is still counted until this hook
            // returns, so 1 means "last subscriber leaving".
            if channels.get(&name).is_some_and(|tx| tx.receiver_count() <= 1) {
                channels.remove(&name);
            }
        }))
    }
}
