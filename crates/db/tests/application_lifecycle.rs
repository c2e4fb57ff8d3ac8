//! Integration tests for application repository operations.
//!
//! Covers the store-level uniqueness backstop, status stamps, the
//! transactional accept, the pending-edit guard, and batched updates.

use sqlx::PgPool;

use reachly_core::error::CoreError;
use reachly_db::error::classify;
use reachly_db::models::application::{NewApplication, UpdateApplication};
use reachly_db::models::campaign::NewCampaign;
use reachly_db::repositories::{ApplicationRepo, CampaignRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

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

fn new_application(cover_letter: &str) -> NewApplication {
    NewApplication {
        cover_letter: cover_letter.to_string(),
        proposed_rate: Some(150.0),
        portfolio_links: vec!["https://example.com/reel".to_string()],
        attachments: vec![],
        estimated_delivery: None,
        notes: None,
    }
}

async fn seed_campaign(pool: &PgPool) -> i64 {
    CampaignRepo::create(pool, 1, &new_campaign("Seeded"))
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn second_live_application_violates_unique_index(pool: PgPool) {
    let campaign_id = seed_campaign(&pool).await;

    ApplicationRepo::create(&pool, campaign_id, 7, &new_application("First"))
        .await
        .unwrap();

    let err = ApplicationRepo::create(&pool, campaign_id, 7, &new_application("Second"))
        .await
        .unwrap_err();
    // The partial unique index trips and classifies as Duplicate.
    assert!(matches!(classify(err), CoreError::Duplicate(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn withdrawn_application_does_not_block_reapplying(pool: PgPool) {
    let campaign_id = seed_campaign(&pool).await;

    let first = ApplicationRepo::create(&pool, campaign_id, 7, &new_application("First"))
        .await
        .unwrap();
    ApplicationRepo::update_status(&pool, first.id, "withdrawn", None)
        .await
        .unwrap();

    // The lookup that backs the duplicate check no longer sees it...
    assert!(
        ApplicationRepo::find_active_by_user_and_campaign(&pool, 7, campaign_id)
            .await
            .unwrap()
            .is_none()
    );
    // ...and a fresh application is accepted by the index.
    ApplicationRepo::create(&pool, campaign_id, 7, &new_application("Again"))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Status stamps and the transactional accept
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn status_updates_stamp_shared_and_specific_times(pool: PgPool) {
    let campaign_id = seed_campaign(&pool).await;
    let app = ApplicationRepo::create(&pool, campaign_id, 7, &new_application("Hi"))
        .await
        .unwrap();
    assert_eq!(app.status, "pending");
    assert!(app.status_updated_at.is_none());

    let rejected = ApplicationRepo::update_status(&pool, app.id, "rejected", Some("Not a fit"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.status, "rejected");
    assert!(rejected.status_updated_at.is_some());
    assert!(rejected.rejected_at.is_some());
    assert!(rejected.accepted_at.is_none());
    assert_eq!(rejected.notes.as_deref(), Some("Not a fit"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn accept_links_applicant_into_campaign_selected_set(pool: PgPool) {
    let campaign_id = seed_campaign(&pool).await;
    let app = ApplicationRepo::create(&pool, campaign_id, 7, &new_application("Hi"))
        .await
        .unwrap();

    let accepted = ApplicationRepo::accept(&pool, app.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.status, "accepted");
    assert!(accepted.accepted_at.is_some());

    let campaign = CampaignRepo::find_by_id(&pool, campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.selected_influencers, vec![7]);

    // Accepting again keeps exactly one entry in the set.
    ApplicationRepo::accept(&pool, app.id, None).await.unwrap();
    let campaign = CampaignRepo::find_by_id(&pool, campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.selected_influencers, vec![7]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn accept_of_missing_application_is_none(pool: PgPool) {
    assert!(ApplicationRepo::accept(&pool, 9999, None)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Pending-edit guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn update_pending_refuses_after_status_change(pool: PgPool) {
    let campaign_id = seed_campaign(&pool).await;
    let app = ApplicationRepo::create(&pool, campaign_id, 7, &new_application("Hi"))
        .await
        .unwrap();

    let changes = UpdateApplication {
        cover_letter: Some("Updated letter".to_string()),
        ..Default::default()
    };
    let updated = ApplicationRepo::update_pending(&pool, app.id, &changes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.cover_letter, "Updated letter");
    // Unspecified fields survive.
    assert_eq!(updated.proposed_rate, Some(150.0));

    ApplicationRepo::update_status(&pool, app.id, "rejected", None)
        .await
        .unwrap();
    assert!(ApplicationRepo::update_pending(&pool, app.id, &changes)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Batched updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn batch_update_touches_only_listed_ids(pool: PgPool) {
    let campaign_id = seed_campaign(&pool).await;
    let a = ApplicationRepo::create(&pool, campaign_id, 1, &new_application("A"))
        .await
        .unwrap();
    let b = ApplicationRepo::create(&pool, campaign_id, 2, &new_application("B"))
        .await
        .unwrap();
    let c = ApplicationRepo::create(&pool, campaign_id, 3, &new_application("C"))
        .await
        .unwrap();

    let updated =
        ApplicationRepo::batch_update_status(&pool, &[a.id, b.id], "rejected", Some("Pass"))
            .await
            .unwrap();
    assert_eq!(updated, 2);

    let untouched = ApplicationRepo::find_by_id(&pool, c.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, "pending");
}

#[sqlx::test(migrations = "../../migrations")]
async fn cascade_delete_removes_campaign_applications(pool: PgPool) {
    let campaign_id = seed_campaign(&pool).await;
    let app = ApplicationRepo::create(&pool, campaign_id, 7, &new_application("Hi"))
        .await
        .unwrap();

    CampaignRepo::delete(&pool, campaign_id).await.unwrap();
    assert!(ApplicationRepo::find_by_id(&pool, app.id)
        .await
        .unwrap()
        .is_none());
}
