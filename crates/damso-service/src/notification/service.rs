//! Notification feed service.
//!
//! Classification happens here, per item, on every read: stored rows
//! keep only ids and the kind name, so nickname changes and link-format
//! changes take effect retroactively.

use chrono::{DateTime, Utc};
use serde::Serialize;

use damso_core::result::AppResult;
use damso_database::repositories::notification::NotificationRepository;
use damso_database::repositories::post::PostRepository;
use damso_database::repositories::user::UserRepository;
use damso_entity::notification::model::Notification;

use crate::classify::{classify, fallback};

/// One feed entry, fully rendered for the client.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    /// Notification id.
    pub id: i64,
    /// Kind name as stored.
    #[serde(rename = "type")]
    pub kind: String,
    /// Rendered message.
    pub message: String,
    /// Deep link.
    pub link: String,
    /// Read state.
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Current nickname of the acting user, empty if since deleted.
    pub sender_nickname: String,
}

/// Read side over the notification store.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
    users: UserRepository,
    posts: PostRepository,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(
        notifications: NotificationRepository,
        users: UserRepository,
        posts: PostRepository,
    ) -> Self {
        Self {
            notifications,
            users,
            posts,
        }
    }

    /// The user's feed, newest first: all unread plus read items from the
    /// last 7 days. Nicknames and board slugs are resolved in two batch
    /// queries, not per row.
    pub async fn feed(&self, user_id: i64, limit: Option<i64>) -> AppResult<Vec<FeedItem>> {
        let rows = self.notifications.find_feed(user_id, limit).await?;

        let mut sender_ids: Vec<i64> = rows.iter().map(|n| n.sender_id).collect();
        sender_ids.sort_unstable();
        sender_ids.dedup();

        let mut post_ids: Vec<i64> = rows.iter().filter_map(|n| n.post_id).collect();
        post_ids.sort_unstable();
        post_ids.dedup();

        let nicknames = self.users.nicknames(&sender_ids).await?;
        let board_slugs = self.posts.board_slugs(&post_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let nickname = nicknames.get(&row.sender_id).cloned().unwrap_or_default();
                let board_slug = row.post_id.and_then(|id| board_slugs.get(&id));
                render(row, nickname, board_slug.map(String::as_str))
            })
            .collect())
    }

    /// Unread count for the badge.
    pub async fn unread_count(&self, user_id: i64) -> AppResult<i64> {
        self.notifications.count_unread(user_id).await
    }

    /// Mark the given notifications as read for this user. Foreign ids
    /// are ignored, re-reads keep the original `read_at`. Returns how
    /// many rows actually transitioned.
    pub async fn mark_read(&self, user_id: i64, ids: &[i64]) -> AppResult<u64> {
        self.notifications.mark_read(user_id, ids, Utc::now()).await
    }
}

fn render(row: Notification, sender_nickname: String, board_slug: Option<&str>) -> FeedItem {
    let classified = match row.kind() {
        Some(kind) => classify(
            kind,
            &sender_nickname,
            board_slug,
            row.post_id,
            row.comment_id,
        ),
        None => fallback(),
    };

    FeedItem {
        id: row.id,
        kind: row.kind,
        message: classified.message,
        link: classified.link,
        is_read: row.is_read,
        created_at: row.created_at,
        sender_nickname,
    }
}
