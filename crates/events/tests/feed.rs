//! Integration tests for the live campaign feed.

use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::mpsc;
use tokio::time::timeout;

use reachly_core::query::{CampaignQuery, FilterDescriptor, FilterValue};
use reachly_db::models::campaign::{Campaign, NewCampaign};
use reachly_db::repositories::CampaignRepo;
use reachly_events::{CampaignFeed, EventBus, MarketEvent};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DELIVERY_WAIT: Duration = Duration::from_secs(5);
const QUIET_WAIT: Duration = Duration::from_millis(300);

fn new_campaign(title: &str) -> NewCampaign {
    NewCampaign {
        title: title.to_string(),
        description: "Launch content".to_string(),
        category: "Tech".to_string(),
        budget: 500.0,
        deadline: None,
        status: "active".to_string(),
        location: None,
        is_remote: true,
        content_types: vec![],
        min_followers: 0,
        urgency: "medium".to_string(),
    }
}

fn channel_callback() -> (
    Box<dyn Fn(Vec<Campaign>) + Send + Sync>,
    mpsc::UnboundedReceiver<Vec<Campaign>>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        Box::new(move |campaigns| {
            let _ = tx.send(campaigns);
        }),
        rx,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn delivers_initial_and_refreshed_result_sets(pool: PgPool) {
    let bus = EventBus::default();
    let (callback, mut deliveries) = channel_callback();

    let descriptor = CampaignQuery::default().public_descriptor();
    let subscription = CampaignFeed::subscribe(pool.clone(), &bus, descriptor, callback);

    let initial = timeout(DELIVERY_WAIT, deliveries.recv())
        .await
        .expect("initial delivery")
        .unwrap();
    assert!(initial.is_empty());

    let created = CampaignRepo::create(&pool, 1, &new_campaign("Live"))
        .await
        .unwrap();
    bus.publish(MarketEvent::campaign("campaign.created", created.id));

    let refreshed = timeout(DELIVERY_WAIT, deliveries.recv())
        .await
        .expect("refreshed delivery")
        .unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].id, created.id);

    subscription.unsubscribe();
}

#[sqlx::test(migrations = "../../migrations")]
async fn non_campaign_events_do_not_trigger_deliveries(pool: PgPool) {
    let bus = EventBus::default();
    let (callback, mut deliveries) = channel_callback();

    let descriptor = CampaignQuery::default().public_descriptor();
    let subscription = CampaignFeed::subscribe(pool.clone(), &bus, descriptor, callback);

    // Consume the initial delivery.
    timeout(DELIVERY_WAIT, deliveries.recv())
        .await
        .expect("initial delivery")
        .unwrap();

    bus.publish(MarketEvent::application("application.submitted", 1));
    assert!(
        timeout(QUIET_WAIT, deliveries.recv()).await.is_err(),
        "application events must not refresh the campaign feed"
    );

    subscription.unsubscribe();
}

#[sqlx::test(migrations = "../../migrations")]
async fn query_failure_delivers_empty_result_set(pool: PgPool) {
    CampaignRepo::create(&pool, 1, &new_campaign("Exists"))
        .await
        .unwrap();

    let bus = EventBus::default();
    let (callback, mut deliveries) = channel_callback();

    // A descriptor referencing an unknown column fails at translation; the
    // feed must deliver an empty list instead of dying.
    let descriptor =
        FilterDescriptor::new().with_eq("nonexistent", FilterValue::Text("x".to_string()));
    let subscription = CampaignFeed::subscribe(pool.clone(), &bus, descriptor, callback);

    let delivery = timeout(DELIVERY_WAIT, deliveries.recv())
        .await
        .expect("degraded delivery")
        .unwrap();
    assert!(delivery.is_empty());

    subscription.unsubscribe();
}

#[sqlx::test(migrations = "../../migrations")]
async fn unsubscribe_stops_deliveries(pool: PgPool) {
    let bus = EventBus::default();
    let (callback, mut deliveries) = channel_callback();

    let descriptor = CampaignQuery::default().public_descriptor();
    let subscription = CampaignFeed::subscribe(pool.clone(), &bus, descriptor, callback);

    timeout(DELIVERY_WAIT, deliveries.recv())
        .await
        .expect("initial delivery")
        .unwrap();

    subscription.unsubscribe();
    assert!(subscription.is_cancelled());

    // Give the feed task a moment to observe the cancellation.
    tokio::time::sleep(QUIET_WAIT).await;
    bus.publish(MarketEvent::campaign("campaign.created", 1));
    match timeout(QUIET_WAIT, deliveries.recv()).await {
        // Either nothing arrives, or the feed task already exited and the
        // callback (and its sender) was dropped.
        Err(_) | Ok(None) => {}
        Ok(Some(_)) => panic!("delivery after unsubscribe"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn two_subscriptions_are_independent(pool: PgPool) {
    let bus = EventBus::default();
    let (callback_a, mut deliveries_a) = channel_callback();
    let (callback_b, mut deliveries_b) = channel_callback();

    let descriptor = CampaignQuery::default().public_descriptor();
    let sub_a = CampaignFeed::subscribe(pool.clone(), &bus, descriptor.clone(), callback_a);
    let sub_b = CampaignFeed::subscribe(pool.clone(), &bus, descriptor, callback_b);

    timeout(DELIVERY_WAIT, deliveries_a.recv()).await.expect("a initial").unwrap();
    timeout(DELIVERY_WAIT, deliveries_b.recv()).await.expect("b initial").unwrap();

    sub_a.unsubscribe();

    let created = CampaignRepo::create(&pool, 1, &new_campaign("Still live"))
        .await
        .unwrap();
    bus.publish(MarketEvent::campaign("campaign.created", created.id));

    // B keeps receiving after A unsubscribed.
    let refreshed = timeout(DELIVERY_WAIT, deliveries_b.recv())
        .await
        .expect("b refreshed")
        .unwrap();
    assert_eq!(refreshed.len(), 1);

    sub_b.unsubscribe();
}
