//! The closed set of notification kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event type that produced a notification.
///
/// The set is closed: rows are validated against it at creation time, so
/// adding a kind is a compile-time-checked extension point (the classifier
/// matches exhaustively over this enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone commented on the receiver's post.
    Comment,
    /// Someone replied to the receiver's comment.
    Reply,
    /// Someone liked the receiver's comment.
    LikeComment,
    /// Someone liked the receiver's post.
    PostLike,
    /// Someone sent the receiver a direct message.
    Message,
    /// Someone mentioned the receiver in a comment.
    Mention,
    /// Synthetic notification used for manual push verification.
    Test,
}

impl NotificationKind {
    /// All recognized kinds.
    pub const ALL: [NotificationKind; 7] = [
        Self::Comment,
        Self::Reply,
        Self::LikeComment,
        Self::PostLike,
        Self::Message,
        Self::Mention,
        Self::Test,
    ];

    /// Stable wire/storage name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::LikeComment => "like_comment",
            Self::PostLike => "post_like",
            Self::Message => "message",
            Self::Mention => "mention",
            Self::Test => "test",
        }
    }

    /// Parse a storage name. Returns `None` for anything outside the set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "comment" => Some(Self::Comment),
            "reply" => Some(Self::Reply),
            "like_comment" => Some(Self::LikeComment),
            "post_like" => Some(Self::PostLike),
            "message" => Some(Self::Message),
            "mention" => Some(Self::Mention),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// Like-type kinds are never pushed to their own author.
    pub fn is_like(&self) -> bool {
        matches!(self, Self::LikeComment | Self::PostLike)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
