//! # damso-api
//!
//! HTTP surface for the Damso notification service: REST endpoints for
//! the feed and the push registry, the SSE live stream, bearer-token
//! extractors, and the server bootstrap.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;
