//! Per-user notification stream.
//!
//! The bus carries every notification on one shared channel; this
//! adapter filters down to a single receiver's items. A lagged
//! subscriber skips the overwritten frames and keeps going (the store
//! remains the source of truth); a closed bus ends the stream.

use futures::Stream;
use futures::stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use damso_core::bus::BusSubscription;
use damso_entity::notification::model::Notification;

/// Adapt a bus subscription into a stream of this user's notifications.
pub fn user_notifications(
    subscription: BusSubscription,
    user_id: i64,
) -> impl Stream<Item = Notification> + Send {
    stream::unfold(subscription, move |mut subscription| async move {
        loop {
            match subscription.recv().await {
                Ok(payload) => match serde_json::from_str::<Notification>(&payload) {
                    Ok(notification) if notification.receiver_id == user_id => {
                        return Some((notification, subscription));
                    }
                    Ok(_) => continue,
                    Err(error) => {
                        warn!(%error, "discarding malformed bus frame");
                        continue;
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(user_id, skipped, "notification stream lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
