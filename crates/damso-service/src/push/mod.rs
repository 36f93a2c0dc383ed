//! Web Push delivery channel.

pub mod channel;

pub use channel::{PushChannel, PushError, PushPayload, PushPayloadData};
