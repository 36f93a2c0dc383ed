//! # damso-database
//!
//! PostgreSQL connection management, embedded migrations, and repository
//! implementations for the Damso notification service.

pub mod connection;
pub mod migration;
pub mod repositories;
