//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use damso_core::bus::EventBus;
use damso_core::config::AppConfig;
use damso_service::dispatch::FanoutDispatcher;
use damso_service::notification::NotificationService;
use damso_service::subscription::SubscriptionService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Event bus for the live stream.
    pub bus: Arc<dyn EventBus>,
    /// Feed read side.
    pub notification_service: Arc<NotificationService>,
    /// Push endpoint registry.
    pub subscription_service: Arc<SubscriptionService>,
    /// Fan-out dispatcher.
    pub dispatcher: Arc<FanoutDispatcher>,
}
