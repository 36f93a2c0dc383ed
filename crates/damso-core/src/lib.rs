//! # damso-core
//!
//! Core crate for the Damso notification service. Contains configuration
//! schemas, the unified error system, and the event-bus trait seam used
//! by the live stream channel.
//!
//! This crate has **no** internal dependencies on other Damso crates.

pub mod bus;
pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
