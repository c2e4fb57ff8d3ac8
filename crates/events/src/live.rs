//! Live campaign feed: push-based delivery of a filter descriptor's
//! result set.
//!
//! A subscription runs the descriptor query once up front and again after
//! every campaign event on the bus, invoking the callback with the *entire*
//! current result set each time (not a diff). A failing query is logged and
//! delivered as an empty list so the consumer renders an empty state
//! instead of crashing; transient and permanent failures are not
//! distinguished and no reconnection is attempted here.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use reachly_core::query::FilterDescriptor;
use reachly_db::models::campaign::Campaign;
use reachly_db::repositories::CampaignRepo;
use reachly_db::DbPool;

use crate::bus::{entities, EventBus};

/// Callback invoked with each delivery of the current result set.
pub type FeedCallback = dyn Fn(Vec<Campaign>) + Send + Sync;

/// Handle to an active feed subscription.
///
/// Dropping the handle does *not* stop the feed; call
/// [`unsubscribe`](FeedSubscription::unsubscribe). There is no reference
/// counting: subscribing twice to the same descriptor creates two
/// independent feeds.
pub struct FeedSubscription {
    token: CancellationToken,
}

impl FeedSubscription {
    /// Stop the feed. No further deliveries happen after this returns.
    pub fn unsubscribe(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the feed has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Push-based campaign result sets.
pub struct CampaignFeed;

impl CampaignFeed {
    /// Subscribe to live results for `descriptor`.
    ///
    /// Delivers the initial result set immediately, then re-delivers after
    /// every campaign event published on `bus`. Returns the disposer; the
    /// caller owns unsubscribing.
    pub fn subscribe(
        pool: DbPool,
        bus: &EventBus,
        descriptor: FilterDescriptor,
        callback: Box<FeedCallback>,
    ) -> FeedSubscription {
        let mut receiver = bus.subscribe();
        let token = CancellationToken::new();
        let task_token = token.clone();

        tokio::spawn(async move {
            Self::deliver(&pool, &descriptor, &callback).await;

            loop {
                tokio::select! {
                    // Check cancellation first so an unsubscribed feed never
                    // delivers again.
                    biased;
                    _ = task_token.cancelled() => break,
                    received = receiver.recv() => match received {
                        Ok(event) if event.is_for(entities::CAMPAIGN) => {
                            Self::deliver(&pool, &descriptor, &callback).await;
                        }
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Missed events collapse into one refresh; the
                            // feed always re-reads the full result set.
                            tracing::warn!(skipped, "Campaign feed lagged, refreshing");
                            Self::deliver(&pool, &descriptor, &callback).await;
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::debug!("Event bus closed, campaign feed shutting down");
                            break;
                        }
                    },
                }
            }
        });

        FeedSubscription { token }
    }

    /// Run the descriptor query and invoke the callback with the results,
    /// or with an empty list when the query fails.
    async fn deliver(pool: &DbPool, descriptor: &FilterDescriptor, callback: &FeedCallback) {
        match CampaignRepo::list_filtered(pool, descriptor).await {
            Ok(campaigns) => callback(campaigns),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Campaign feed query failed, delivering empty result set"
                );
                callback(Vec::new());
            }
        }
    }
}
