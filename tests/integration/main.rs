//! Integration tests against a live PostgreSQL instance.
//!
//! Set `TEST_DATABASE_URL` to run these; without it every test is a
//! silent no-op so the suite passes in environments with no database.

mod helpers;
mod notification_test;
mod push_test;
