//! PostgreSQL LISTEN/NOTIFY event bus for multi-node deployments.
//!
//! One background task per channel holds a `PgListener` and fans frames
//! into a local broadcast channel; subscribers share the listener and
//! the task is torn down when the last subscriber drops. Publishing is
//! `pg_notify` through the regular pool, so every node sees every frame.
//!
//! NOTIFY payloads are capped at roughly 8000 bytes by the server;
//! notification rows are far below that.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use damso_core::bus::{BusSubscription, EventBus};
use damso_core::error::{AppError, ErrorKind};
use damso_core::result::AppResult;

/// Cross-node bus over PostgreSQL LISTEN/NOTIFY.
#[derive(Clone)]
pub struct PostgresBus {
    pool: PgPool,
    buffer_size: usize,
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    channels: Mutex<HashMap<String, ChannelEntry>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        for entry in channels.values() {
            entry.listener.abort();
        }
    }
}

struct ChannelEntry {
    sender: broadcast::Sender<String>,
    subscribers: usize,
    listener: JoinHandle<()>,
}

impl PostgresBus {
    /// Create a new bus over the given pool.
    pub fn new(pool: PgPool, buffer_size: usize) -> Self {
        Self {
            pool,
            buffer_size,
            inner: Arc::new(Inner::default()),
        }
    }

    /// Connect a dedicated listener session for one channel and pump its
    /// frames into the broadcast sender until aborted.
    async fn start_listener(
        &self,
        channel: &str,
    ) -> AppResult<(broadcast::Sender<String>, JoinHandle<()>)> {
        let mut listener = PgListener::connect_with(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Stream, "Failed to open listen session", e)
        })?;
        listener.listen(channel).await.map_err(|e| {
            AppError::with_source(ErrorKind::Stream, "Failed to listen on channel", e)
        })?;

        let (sender, _) = broadcast::channel(self.buffer_size);
        let tx = sender.clone();
        let name = channel.to_string();
        let handle = tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        let _ = tx.send(notification.payload().to_string());
                    }
                    // recv reconnects transparently; an error here means
                    // the reconnect itself failed. Back off and retry.
                    Err(error) => {
                        warn!(channel = %name, %error, "listen session error, retrying");
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok((sender, handle))
    }
}

#[async_trait]
impl EventBus for PostgresBus {
    async fn publish(&self, channel: &str, payload: &str) -> AppResult<()> {
        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(channel)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to notify", e))?;
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> AppResult<BusSubscription> {
        // Fast path: listener already running for this channel.
        {
            let mut channels = self
                .inner
                .channels
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = channels.get_mut(channel) {
                entry.subscribers += 1;
                let receiver = entry.sender.subscribe();
                return Ok(BusSubscription::new(
                    receiver,
                    release_hook(Arc::downgrade(&self.inner), channel.to_string()),
                ));
            }
        }

        // Connect outside the lock; on a lost race the extra listener is
        // dropped and we join the one that won.
        let (sender, handle) = self.start_listener(channel).await?;

        let mut channels = self
            .inner
            .channels
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let entry = match channels.entry(channel.to_string()) {
            Entry::Occupied(occupied) => {
                handle.abort();
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => {
                debug!(channel, "listen session started");
                vacant.insert(ChannelEntry {
                    sender,
                    subscribers: 0,
                    listener: handle,
                })
            }
        };
        entry.subscribers += 1;
        let receiver = entry.sender.subscribe();

        Ok(BusSubscription::new(
            receiver,
            release_hook(Arc::downgrade(&self.inner), channel.to_string()),
        ))
    }
}

/// Decrement the channel's refcount; the last subscriber out stops the
/// listener task. Weak so a lingering subscription does not outlive a
/// dropped bus.
fn release_hook(inner: Weak<Inner>, channel: String) -> impl FnOnce() + Send + 'static {
    move || {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let mut channels = inner.channels.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = channels.get_mut(&channel) {
            entry.subscribers -= 1;
            if entry.subscribers == 0 {
                let entry = channels.remove(&channel);
                if let Some(entry) = entry {
                    entry.listener.abort();
                    debug!(channel = %channel, "listen session stopped");
                }
            }
        }
    }
}
