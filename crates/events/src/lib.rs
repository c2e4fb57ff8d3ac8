//! Reachly event bus and live-query infrastructure.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`MarketEvent`] — the canonical domain event envelope.
//! - [`CampaignFeed`] — push-based delivery of a filter descriptor's result
//!   set, re-run on every campaign change.

pub mod bus;
pub mod live;

pub use bus::{EventBus, MarketEvent};
pub use live::{CampaignFeed, FeedSubscription};
