//! # damso-realtime
//!
//! Live delivery backbone: [`EventBus`](damso_core::bus::EventBus)
//! implementations (in-memory broadcast for single-node deployments,
//! PostgreSQL LISTEN/NOTIFY for multi-node) and the per-user notification
//! stream consumed by the SSE endpoint.

pub mod bus;
pub mod stream;

pub use bus::memory::MemoryBus;
pub use bus::postgres::PostgresBus;
pub use stream::user_notifications;
