//! Notification entity.

pub mod kind;
pub mod model;
