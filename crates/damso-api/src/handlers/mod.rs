//! HTTP handlers.

pub mod health;
pub mod notification;
pub mod push;
pub mod stream;
