//! Event-bus implementations.

pub mod memory;
pub mod postgres;
