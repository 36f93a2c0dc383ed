//! Push subscription registry behavior.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

fn subscription_body(endpoint: &str) -> serde_json::Value {
    json!({
        "subscription": {
            "endpoint": endpoint,
            "keys": { "p256dh": "test-p256dh", "auth": "test-auth" }
        }
    })
}

async fn subscription_count(app: &TestApp, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM push_subscriptions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap()
}

async fn notification_enabled(app: &TestApp, user_id: i64) -> bool {
    sqlx::query_scalar("SELECT notification_enabled FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn subscribe_sets_status_and_enabled_flag() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    let status = app.request("GET", "/api/push/status", None, Some(&token)).await;
    assert_eq!(status.body["hasSubscription"], false);

    let res = app
        .request(
            "POST",
            "/api/push/subscribe",
            Some(subscription_body("https://push.example/a")),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);

    let status = app.request("GET", "/api/push/status", None, Some(&token)).await;
    assert_eq!(status.body["hasSubscription"], true);
    assert!(notification_enabled(&app, bora).await);
}

#[tokio::test]
async fn resubscribe_keeps_a_single_row() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    for endpoint in ["https://push.example/a", "https://push.example/b"] {
        let res = app
            .request(
                "POST",
                "/api/push/subscribe",
                Some(subscription_body(endpoint)),
                Some(&token),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK);
    }

    assert_eq!(subscription_count(&app, bora).await, 1);

    let endpoint: String =
        sqlx::query_scalar("SELECT endpoint FROM push_subscriptions WHERE user_id = $1")
            .bind(bora)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(endpoint, "https://push.example/b");
}

#[tokio::test]
async fn endpoint_moves_to_the_registering_user() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let chan = app.create_user("Chan").await;

    let res = app
        .request(
            "POST",
            "/api/push/subscribe",
            Some(subscription_body("https://push.example/shared")),
            Some(&app.token_for(bora, "Bora")),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    // Same browser, now logged in as Chan.
    let res = app
        .request(
            "POST",
            "/api/push/subscribe",
            Some(subscription_body("https://push.example/shared")),
            Some(&app.token_for(chan, "Chan")),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    assert_eq!(subscription_count(&app, bora).await, 0);
    assert_eq!(subscription_count(&app, chan).await, 1);
}

#[tokio::test]
async fn unsubscribe_clears_flag_and_404s_on_unknown() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    app.request(
        "POST",
        "/api/push/subscribe",
        Some(subscription_body("https://push.example/a")),
        Some(&token),
    )
    .await;

    let res = app
        .request(
            "POST",
            "/api/push/unsubscribe",
            Some(json!({ "endpoint": "https://push.example/a" })),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(!notification_enabled(&app, bora).await);

    let res = app
        .request(
            "POST",
            "/api/push/unsubscribe",
            Some(json!({ "endpoint": "https://push.example/a" })),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_endpoint_is_rejected() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    let res = app
        .request(
            "POST",
            "/api/push/subscribe",
            Some(subscription_body("")),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(subscription_count(&app, bora).await, 0);
}

#[tokio::test]
async fn subscription_without_keys_is_rejected() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    let res = app
        .request(
            "POST",
            "/api/push/subscribe",
            Some(json!({
                "subscription": { "endpoint": "https://push.example/a" }
            })),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "VALIDATION_ERROR");
    assert_eq!(subscription_count(&app, bora).await, 0);
}

#[tokio::test]
async fn push_endpoints_require_auth() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let res = app
        .request(
            "POST",
            "/api/push/subscribe",
            Some(subscription_body("https://push.example/a")),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app.request("GET", "/api/push/status", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}
