//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use damso_core::config::AppConfig;
use damso_core::config::app::ServerConfig;
use damso_core::config::auth::AuthConfig;
use damso_core::config::database::DatabaseConfig;
use damso_core::config::logging::LoggingConfig;
use damso_core::config::push::PushConfig;
use damso_core::config::stream::{BusProvider, StreamConfig};
use damso_realtime::MemoryBus;

const TEST_SECRET: &str = "integration-test-secret";

/// Tests share one database; serialize them so the per-test cleanup in
/// `TestApp::new` cannot race another test's writes.
fn db_lock() -> Arc<tokio::sync::Mutex<()>> {
    static LOCK: std::sync::OnceLock<Arc<tokio::sync::Mutex<()>>> = std::sync::OnceLock::new();
    Arc::clone(LOCK.get_or_init(|| Arc::new(tokio::sync::Mutex::new(()))))
}

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Database pool for direct queries.
    pub db_pool: PgPool,
    _guard: tokio::sync::OwnedMutexGuard<()>,
}

impl TestApp {
    /// Create a test application, or `None` when `TEST_DATABASE_URL` is
    /// not set.
    pub async fn new() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let guard = db_lock().lock_owned().await;

        let config = test_config(url);

        let db_pool = damso_database::connection::create_pool(&config.database)
            .await
            .expect("Failed to connect to test database");

        damso_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let bus = Arc::new(MemoryBus::new(config.stream.buffer_size));
        let router = damso_api::app::build_app(config, db_pool.clone(), bus);

        Some(Self {
            router,
            db_pool,
            _guard: guard,
        })
    }

    /// Clean all test data from the database.
    async fn clean_database(pool: &PgPool) {
        let tables = ["push_subscriptions", "notifications", "posts", "users"];
        for table in &tables {
            let query = format!("DELETE FROM {table}");
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a user and return their id.
    pub async fn create_user(&self, nickname: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO users (nickname) VALUES ($1) RETURNING id")
            .bind(nickname)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to create test user")
    }

    /// Create a post and return its id.
    pub async fn create_post(&self, board_slug: &str, author_id: i64, title: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO posts (board_slug, author_id, title) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(board_slug)
        .bind(author_id)
        .bind(title)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create test post")
    }

    /// Mint a bearer token for a user.
    pub fn token_for(&self, user_id: i64, nickname: &str) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        let claims = serde_json::json!({
            "sub": user_id,
            "nickname": nickname,
            "exp": exp,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to mint test token")
    }

    /// Make an HTTP request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        },
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            leeway_seconds: 30,
        },
        // No VAPID key: push delivery is disabled so dispatch exercises
        // store + stream only.
        push: PushConfig {
            enabled: false,
            ..PushConfig::default()
        },
        stream: StreamConfig {
            provider: BusProvider::Memory,
            ..StreamConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}
