//! # damso-entity
//!
//! Database row models for the Damso notification service: notifications,
//! push subscriptions, and the minimal collaborator tables (users, posts)
//! the subsystem reads from.

pub mod notification;
pub mod push;
pub mod user;

pub use notification::kind::NotificationKind;
pub use notification::model::Notification;
pub use push::PushSubscription;
pub use user::User;
