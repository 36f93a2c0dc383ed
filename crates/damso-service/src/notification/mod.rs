//! Notification feed read side and read-state transitions.

pub mod service;

pub use service::{FeedItem, NotificationService};
