//! Fan-out dispatcher.
//!
//! Single entry point for creating a notification. The store write is
//! authoritative: once the row is persisted the dispatch has succeeded,
//! and the push and live-stream channels are attempted best-effort in
//! parallel. A channel failure is logged and swallowed, never propagated
//! to the caller.

use std::sync::Arc;

use tracing::{debug, warn};

use damso_core::bus::EventBus;
use damso_core::result::AppResult;
use damso_database::repositories::notification::{NewNotification, NotificationRepository};
use damso_database::repositories::post::PostRepository;
use damso_database::repositories::push_subscription::PushSubscriptionRepository;
use damso_database::repositories::user::UserRepository;
use damso_entity::notification::kind::NotificationKind;
use damso_entity::notification::model::Notification;

use crate::classify::{ClassifiedMessage, classify, fallback};
use crate::push::{PushChannel, PushError};

/// One notification to fan out.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// Receiving user.
    pub receiver_id: i64,
    /// Acting user.
    pub sender_id: i64,
    /// Validated kind.
    pub kind: NotificationKind,
    /// Post involved, if any.
    pub post_id: Option<i64>,
    /// Comment involved, if any.
    pub comment_id: Option<i64>,
    /// Optional free-text content.
    pub content: Option<String>,
}

/// Persists a notification and fans it out to the delivery channels.
#[derive(Clone)]
pub struct FanoutDispatcher {
    notifications: NotificationRepository,
    subscriptions: PushSubscriptionRepository,
    users: UserRepository,
    posts: PostRepository,
    push: PushChannel,
    bus: Arc<dyn EventBus>,
    stream_channel: String,
}

impl FanoutDispatcher {
    /// Wire a dispatcher from its collaborators.
    pub fn new(
        notifications: NotificationRepository,
        subscriptions: PushSubscriptionRepository,
        users: UserRepository,
        posts: PostRepository,
        push: PushChannel,
        bus: Arc<dyn EventBus>,
        stream_channel: impl Into<String>,
    ) -> Self {
        Self {
            notifications,
            subscriptions,
            users,
            posts,
            push,
            bus,
            stream_channel: stream_channel.into(),
        }
    }

    /// Create a notification and fan it out.
    ///
    /// Errors only when the store write fails; an unresolvable receiver
    /// or sender surfaces as a validation error. The returned row is the
    /// persisted notification regardless of channel outcomes.
    pub async fn dispatch(&self, request: DispatchRequest) -> AppResult<Notification> {
        let notification = self
            .notifications
            .create(&NewNotification {
                receiver_id: request.receiver_id,
                sender_id: request.sender_id,
                kind: request.kind,
                post_id: request.post_id,
                comment_id: request.comment_id,
                content: request.content.clone(),
            })
            .await?;

        debug!(
            notification_id = notification.id,
            receiver_id = notification.receiver_id,
            kind = %request.kind,
            "notification persisted"
        );

        tokio::join!(
            self.deliver_push(&notification),
            self.signal_stream(&notification),
        );

        Ok(notification)
    }

    /// Best-effort Web Push delivery.
    ///
    /// Skipped when push is unconfigured, when the receiver has no
    /// endpoint, and for self-likes. A permanently invalid endpoint is
    /// reaped so the next dispatch does not retry it.
    async fn deliver_push(&self, notification: &Notification) {
        if !self.push.is_enabled() {
            return;
        }
        if notification.sender_id == notification.receiver_id
            && notification.kind().is_some_and(|k| k.is_like())
        {
            debug!(notification_id = notification.id, "self-like, push skipped");
            return;
        }

        let subscription = match self.subscriptions.find_by_user(notification.receiver_id).await {
            Ok(Some(subscription)) => subscription,
            Ok(None) => return,
            Err(error) => {
                warn!(
                    notification_id = notification.id,
                    %error,
                    "failed to load push endpoint"
                );
                return;
            }
        };

        let classified = self.classify_row(notification).await;
        let payload = self
            .push
            .payload(notification.id, &classified.message, &classified.link);

        match self.push.send(&subscription, &payload).await {
            Ok(()) => {
                debug!(notification_id = notification.id, "push delivered");
            }
            Err(PushError::EndpointGone) => {
                debug!(
                    notification_id = notification.id,
                    "push endpoint gone, reaping"
                );
                if let Err(error) = self
                    .subscriptions
                    .delete_by_endpoint(&subscription.endpoint)
                    .await
                {
                    warn!(%error, "failed to reap dead push endpoint");
                }
            }
            Err(error) => {
                warn!(notification_id = notification.id, %error, "push delivery failed");
            }
        }
    }

    /// Best-effort live-stream signal: the full row, serialized, on the
    /// shared bus channel. Stream consumers filter by receiver.
    async fn signal_stream(&self, notification: &Notification) {
        let payload = match serde_json::to_string(notification) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(notification_id = notification.id, %error, "failed to encode bus payload");
                return;
            }
        };

        if let Err(error) = self.bus.publish(&self.stream_channel, &payload).await {
            warn!(notification_id = notification.id, %error, "bus publish failed");
        }
    }

    /// Classification for push bodies: sender nickname and board slug are
    /// resolved at delivery time, with graceful degradation when either
    /// has since disappeared.
    async fn classify_row(&self, notification: &Notification) -> ClassifiedMessage {
        let Some(kind) = notification.kind() else {
            return fallback();
        };

        let nickname = match self.users.find_by_id(notification.sender_id).await {
            Ok(Some(user)) => user.nickname,
            Ok(None) | Err(_) => String::new(),
        };

        let board_slug = match notification.post_id {
            Some(post_id) => self.posts.board_slug(post_id).await.unwrap_or_default(),
            None => None,
        };

        classify(
            kind,
            &nickname,
            board_slug.as_deref(),
            notification.post_id,
            notification.comment_id,
        )
    }
}
