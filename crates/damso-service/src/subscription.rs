//! Delivery endpoint registry rules.

use tracing::info;

use damso_core::error::AppError;
use damso_core::result::AppResult;
use damso_database::repositories::push_subscription::PushSubscriptionRepository;
use damso_entity::push::PushSubscription;

/// Service over the push subscription registry.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    subscriptions: PushSubscriptionRepository,
}

impl SubscriptionService {
    /// Create a new subscription service.
    pub fn new(subscriptions: PushSubscriptionRepository) -> Self {
        Self { subscriptions }
    }

    /// Register the user's browser subscription, replacing any previous
    /// one. One endpoint per user; re-registering an endpoint owned by
    /// another account moves it here.
    pub async fn subscribe(
        &self,
        user_id: i64,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> AppResult<PushSubscription> {
        if endpoint.trim().is_empty() {
            return Err(AppError::validation("Subscription endpoint is required"));
        }
        if p256dh.trim().is_empty() || auth.trim().is_empty() {
            return Err(AppError::validation("Subscription keys are required"));
        }

        let subscription = self
            .subscriptions
            .replace_for_user(user_id, endpoint, p256dh, auth)
            .await?;

        info!(user_id, "push subscription registered");
        Ok(subscription)
    }

    /// Remove an endpoint wherever it is registered. Unknown endpoints
    /// are a not-found error so clients can drop stale local state.
    pub async fn unsubscribe(&self, endpoint: &str) -> AppResult<i64> {
        match self.subscriptions.delete_by_endpoint(endpoint).await? {
            Some(user_id) => {
                info!(user_id, "push subscription removed");
                Ok(user_id)
            }
            None => Err(AppError::not_found("Endpoint is not registered")),
        }
    }

    /// Whether the user currently has an active subscription.
    pub async fn status(&self, user_id: i64) -> AppResult<bool> {
        self.subscriptions.has_active_subscription(user_id).await
    }
}
