//! Application builder: wires repositories, services, and the dispatcher
//! into `AppState`, and runs the HTTP server.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tracing::info;

use damso_core::bus::EventBus;
use damso_core::config::AppConfig;
use damso_core::error::AppError;
use damso_core::result::AppResult;
use damso_database::repositories::notification::NotificationRepository;
use damso_database::repositories::post::PostRepository;
use damso_database::repositories::push_subscription::PushSubscriptionRepository;
use damso_database::repositories::user::UserRepository;
use damso_service::dispatch::FanoutDispatcher;
use damso_service::notification::NotificationService;
use damso_service::push::PushChannel;
use damso_service::subscription::SubscriptionService;

use crate::router::build_router;
use crate::state::AppState;

/// Wire repositories, services, and the dispatcher into shared state.
pub fn build_state(config: AppConfig, db_pool: PgPool, bus: Arc<dyn EventBus>) -> AppState {
    let notification_repo = NotificationRepository::new(db_pool.clone());
    let subscription_repo = PushSubscriptionRepository::new(db_pool.clone());
    let user_repo = UserRepository::new(db_pool.clone());
    let post_repo = PostRepository::new(db_pool.clone());

    let push_channel = PushChannel::new(config.push.clone());

    let dispatcher = FanoutDispatcher::new(
        notification_repo.clone(),
        subscription_repo.clone(),
        user_repo.clone(),
        post_repo.clone(),
        push_channel,
        Arc::clone(&bus),
        config.stream.channel.clone(),
    );

    AppState {
        config: Arc::new(config),
        db_pool,
        bus,
        notification_service: Arc::new(NotificationService::new(
            notification_repo,
            user_repo,
            post_repo,
        )),
        subscription_service: Arc::new(SubscriptionService::new(subscription_repo)),
        dispatcher: Arc::new(dispatcher),
    }
}

/// Build the complete application router.
pub fn build_app(config: AppConfig, db_pool: PgPool, bus: Arc<dyn EventBus>) -> Router {
    build_router(build_state(config, db_pool, bus))
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run_server(
    config: AppConfig,
    db_pool: PgPool,
    bus: Arc<dyn EventBus>,
) -> AppResult<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(config, db_pool, bus);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Damso server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Damso server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
