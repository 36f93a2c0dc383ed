//! Notification trigger, feed, unread count, and read transitions.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn create_then_read_full_cycle() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let chan = app.create_user("Chan").await;
    let post = app.create_post("free", bora, "첫 글").await;
    let token = app.token_for(bora, "Bora");

    // Chan comments on Bora's post.
    let created = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({
                "receiver_id": bora,
                "sender_id": chan,
                "type": "comment",
                "post_id": post,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(created.body["success"], true);
    assert_eq!(created.body["notification"]["type"], "comment");
    let id = created.body["notification"]["id"].as_i64().unwrap();

    // The feed renders the message and link from current data.
    let feed = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(feed.status, StatusCode::OK);
    let items = feed.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap(), id);
    assert_eq!(items[0]["sender_nickname"], "Chan");
    assert!(items[0]["message"].as_str().unwrap().contains("Chan"));
    assert_eq!(
        items[0]["link"].as_str().unwrap(),
        format!("/board/free/{post}")
    );
    assert_eq!(items[0]["is_read"], false);

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.body["data"]["count"], 1);

    // Mark read, twice: the second pass transitions nothing.
    let read = app
        .request(
            "PATCH",
            "/api/notifications/read",
            Some(json!({ "notificationIds": [id] })),
            Some(&token),
        )
        .await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.body["data"]["updated"], 1);

    let again = app
        .request(
            "PATCH",
            "/api/notifications/read",
            Some(json!({ "notificationIds": [id] })),
            Some(&token),
        )
        .await;
    assert_eq!(again.body["data"]["updated"], 0);

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(count.body["data"]["count"], 0);
}

#[tokio::test]
async fn feed_is_newest_first() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let chan = app.create_user("Chan").await;
    let token = app.token_for(bora, "Bora");

    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = app
            .request(
                "POST",
                "/api/notifications",
                Some(json!({
                    "receiver_id": bora,
                    "sender_id": chan,
                    "type": "message",
                })),
                Some(&token),
            )
            .await;
        ids.push(created.body["notification"]["id"].as_i64().unwrap());
    }

    let feed = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    let listed: Vec<i64> = feed.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();

    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(listed, expected);

    // Limit caps from the newest end.
    let feed = app
        .request("GET", "/api/notifications?limit=2", None, Some(&token))
        .await;
    assert_eq!(feed.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        feed.body["data"][0]["id"].as_i64().unwrap(),
        *ids.last().unwrap()
    );
}

#[tokio::test]
async fn feed_keeps_old_unread_and_drops_old_read() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let chan = app.create_user("Chan").await;
    let token = app.token_for(bora, "Bora");

    // Rows older than the 7-day window, one unread and one already read.
    let old_unread: i64 = sqlx::query_scalar(
        "INSERT INTO notifications (receiver_id, sender_id, kind, created_at) \
         VALUES ($1, $2, 'message', NOW() - INTERVAL '30 days') RETURNING id",
    )
    .bind(bora)
    .bind(chan)
    .fetch_one(&app.db_pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO notifications \
             (receiver_id, sender_id, kind, is_read, read_at, created_at) \
         VALUES ($1, $2, 'message', TRUE, NOW() - INTERVAL '29 days', \
             NOW() - INTERVAL '30 days')",
    )
    .bind(bora)
    .bind(chan)
    .execute(&app.db_pool)
    .await
    .unwrap();

    let feed = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    let items = feed.body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap(), old_unread);
    assert_eq!(items[0]["is_read"], false);
}

#[tokio::test]
async fn unknown_type_is_rejected() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    let res = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({
                "receiver_id": bora,
                "sender_id": bora,
                "type": "kudos",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_body_fields_are_rejected() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    let res = app
        .request("POST", "/api/notifications", Some(json!({})), Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "VALIDATION_ERROR");

    let res = app
        .request(
            "PATCH",
            "/api/notifications/read",
            Some(json!({})),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unresolvable_receiver_is_rejected() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let token = app.token_for(bora, "Bora");

    let res = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({
                "receiver_id": 999_999,
                "sender_id": bora,
                "type": "comment",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unread_count_is_zero_for_anonymous() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let res = app
        .request("GET", "/api/notifications/unread-count", None, None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["count"], 0);
}

#[tokio::test]
async fn feed_requires_auth() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let res = app.request("GET", "/api/notifications", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mark_read_ignores_other_users_rows() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let bora = app.create_user("Bora").await;
    let chan = app.create_user("Chan").await;
    let bora_token = app.token_for(bora, "Bora");
    let chan_token = app.token_for(chan, "Chan");

    let created = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({
                "receiver_id": bora,
                "sender_id": chan,
                "type": "mention",
            })),
            Some(&bora_token),
        )
        .await;
    let id = created.body["notification"]["id"].as_i64().unwrap();

    // Chan cannot flip Bora's notification.
    let res = app
        .request(
            "PATCH",
            "/api/notifications/read",
            Some(json!({ "notificationIds": [id] })),
            Some(&chan_token),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["updated"], 0);

    let count = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&bora_token),
        )
        .await;
    assert_eq!(count.body["data"]["count"], 1);
}

#[tokio::test]
async fn stream_requires_a_token() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let res = app
        .request("GET", "/api/notifications/stream", None, None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_ok() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let res = app.request("GET", "/api/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"], "up");
}
