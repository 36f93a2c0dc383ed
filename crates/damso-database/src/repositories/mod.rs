//! Repository implementations.

pub mod notification;
pub mod post;
pub mod push_subscription;
pub mod user;
