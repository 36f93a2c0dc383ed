//! Notification classification.
//!
//! Maps a notification kind plus the acting user's nickname and the
//! post/comment identifiers into the user-facing message and deep link.
//! Pure and total: never fails, recomputed on every read so historical
//! notifications always render with current nicknames and current link
//! conventions. Nothing here is persisted.

use serde::{Deserialize, Serialize};

use damso_entity::notification::kind::NotificationKind;

/// The rendering of one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedMessage {
    /// Human-readable message.
    pub message: String,
    /// Deep link into the forum frontend.
    pub link: String,
}

/// Classify a notification into its message and link.
///
/// Missing `board_slug` or `post_id` collapse the link to `/`; a missing
/// `comment_id` drops only the fragment. The `test` kind (and, at read
/// time, anything unparseable) renders the generic fallback.
pub fn classify(
    kind: NotificationKind,
    sender_nickname: &str,
    board_slug: Option<&str>,
    post_id: Option<i64>,
    comment_id: Option<i64>,
) -> ClassifiedMessage {
    let post = post_link(board_slug, post_id);

    match kind {
        NotificationKind::Comment => ClassifiedMessage {
            message: format!("게시글에 {sender_nickname}님이 댓글을 달았습니다."),
            link: post,
        },
        NotificationKind::Reply => ClassifiedMessage {
            message: format!("댓글에 {sender_nickname}님이 대댓글을 달았습니다."),
            link: with_comment_fragment(post, comment_id),
        },
        NotificationKind::LikeComment => ClassifiedMessage {
            message: format!("{sender_nickname}님이 댓글을 좋아합니다."),
            link: with_comment_fragment(post, comment_id),
        },
        NotificationKind::PostLike => ClassifiedMessage {
            message: format!("{sender_nickname}님이 게시글을 좋아합니다."),
            link: post,
        },
        NotificationKind::Message => ClassifiedMessage {
            message: format!("{sender_nickname}님이 쪽지를 보냈습니다."),
            link: "/my/message".to_string(),
        },
        NotificationKind::Mention => ClassifiedMessage {
            message: format!("{sender_nickname}님이 언급했습니다."),
            link: with_comment_fragment(post, comment_id),
        },
        _ => fallback(),
    }
}

/// The default classification for unrecognized or synthetic kinds.
pub fn fallback() -> ClassifiedMessage {
    ClassifiedMessage {
        message: "새로운 알림이 있습니다.".to_string(),
        link: "/".to_string(),
    }
}

fn post_link(board_slug: Option<&str>, post_id: Option<i64>) -> String {
    match (board_slug, post_id) {
        (Some(slug), Some(id)) => format!("/board/{slug}/{id}"),
        _ => "/".to_string(),
    }
}

fn with_comment_fragment(post_link: String, comment_id: Option<i64>) -> String {
    match comment_id {
        Some(id) if post_link != "/" => format!("{post_link}#comment-{id}"),
        _ => post_link,
    }
}
