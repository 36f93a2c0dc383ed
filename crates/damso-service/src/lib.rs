//! # damso-service
//!
//! Domain services for the Damso notification pipeline: the pure message
//! classifier, the fan-out dispatcher, the push delivery channel, the
//! feed read side, and the endpoint registry rules.

pub mod classify;
pub mod context;
pub mod dispatch;
pub mod notification;
pub mod push;
pub mod subscription;

pub use classify::{ClassifiedMessage, classify, fallback};
pub use context::RequestContext;
pub use dispatch::{DispatchRequest, FanoutDispatcher};
pub use notification::{FeedItem, NotificationService};
pub use push::{PushChannel, PushError, PushPayload};
pub use subscription::SubscriptionService;
