//! Integration tests for the campaign and application lifecycle services.
//!
//! Exercises validation, the duplicate-application rule, ownership checks,
//! the acceptance side effect, and the public-listing rule against a real
//! database.

use assert_matches::assert_matches;
use sqlx::PgPool;

use reachly_core::error::CoreError;
use reachly_core::money::BudgetInput;
use reachly_core::query::CampaignQuery;
use reachly_db::models::application::{
    BatchApplicationEdit, BatchUpdateApplications, BulkUpdateApplicationStatus, CreateApplication,
    UpdateApplication, UpdateApplicationStatus,
};
use reachly_db::models::campaign::CreateCampaign;
use reachly_services::{ApplicationService, CampaignService};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BRAND: i64 = 1;
const OTHER_BRAND: i64 = 2;
const INFLUENCER: i64 = 10;

fn campaign_input(budget: &str, status: Option<&str>) -> CreateCampaign {
    CreateCampaign {
        title: Some("Summer launch".to_string()),
        description: Some("Product launch content".to_string()),
        category: Some("Tech".to_string()),
        budget: Some(BudgetInput::Text(budget.to_string())),
        deadline: None,
        status: status.map(str::to_string),
        location: None,
        is_remote: Some(true),
        content_types: Some(vec!["video".to_string()]),
        min_followers: None,
        urgency: Some("high".to_string()),
    }
}

fn application_input() -> CreateApplication {
    CreateApplication {
        cover_letter: Some("I'd love to work on this".to_string()),
        proposed_rate: Some(150.0),
        portfolio_links: None,
        attachments: None,
        estimated_delivery: None,
        notes: None,
    }
}

async fn seed_active_campaign(pool: &PgPool, brand_id: i64) -> i64 {
    CampaignService::create_campaign(pool, &campaign_input("$500", Some("active")), brand_id)
        .await
        .unwrap()
        .campaign
        .id
}

// ---------------------------------------------------------------------------
// Campaign lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn currency_budget_is_stored_numeric_and_displayed_formatted(pool: PgPool) {
    let view = CampaignService::create_campaign(&pool, &campaign_input("$500", None), BRAND)
        .await
        .unwrap();

    assert_eq!(view.campaign.budget, 500.0);
    assert_eq!(view.budget_display, "$500");
    assert_eq!(view.campaign.status, "draft");
}

#[sqlx::test(migrations = "../../migrations")]
async fn draft_campaigns_are_hidden_until_activated(pool: PgPool) {
    let view = CampaignService::create_campaign(&pool, &campaign_input("$500", None), BRAND)
        .await
        .unwrap();

    let query = CampaignQuery::default();
    let public = CampaignService::get_public_campaigns(&pool, &query).await.unwrap();
    assert!(public.is_empty());

    CampaignService::update_campaign_status(&pool, view.campaign.id, "active")
        .await
        .unwrap();
    let public = CampaignService::get_public_campaigns(&pool, &query).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, view.campaign.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn invalid_status_value_does_not_mutate_the_campaign(pool: PgPool) {
    let id = seed_active_campaign(&pool, BRAND).await;

    let err = CampaignService::update_campaign_status(&pool, id, "archived")
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));

    let campaign = CampaignService::get_campaign(&pool, id).await.unwrap();
    assert_eq!(campaign.status, "active");
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_campaign_resets_lifecycle_fields(pool: PgPool) {
    let id = seed_active_campaign(&pool, BRAND).await;
    CampaignService::increment_views(&pool, id).await;

    let copy = CampaignService::duplicate_campaign(&pool, id, BRAND)
        .await
        .unwrap();
    assert_ne!(copy.campaign.id, id);
    assert_eq!(copy.campaign.status, "draft");
    assert_eq!(copy.campaign.views, 0);
    assert_eq!(copy.campaign.applications_count, 0);
    assert!(copy.campaign.selected_influencers.is_empty());
    assert_eq!(copy.campaign.title, "Summer launch");
}

#[sqlx::test(migrations = "../../migrations")]
async fn only_the_owner_can_delete_a_campaign(pool: PgPool) {
    let id = seed_active_campaign(&pool, BRAND).await;

    let err = CampaignService::delete_campaign(&pool, id, OTHER_BRAND)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Unauthorized(_));

    CampaignService::delete_campaign(&pool, id, BRAND).await.unwrap();
    let err = CampaignService::get_campaign(&pool, id).await.unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Application lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn one_live_application_per_user_per_campaign(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;

    let first =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap();
    assert_eq!(first.status, "pending");

    // Second submission before withdrawal fails.
    let err =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap_err();
    assert_matches!(err, CoreError::Duplicate(_));

    // After withdrawing, a third submission succeeds.
    ApplicationService::withdraw_application(&pool, first.id, INFLUENCER)
        .await
        .unwrap();
    ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_application_bumps_the_campaign_counter(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;

    ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
        .await
        .unwrap();

    let campaign = CampaignService::get_campaign(&pool, campaign_id).await.unwrap();
    assert_eq!(campaign.applications_count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn applying_to_a_draft_campaign_is_rejected(pool: PgPool) {
    let view = CampaignService::create_campaign(&pool, &campaign_input("$500", None), BRAND)
        .await
        .unwrap();

    let err = ApplicationService::create_application(
        &pool,
        &application_input(),
        INFLUENCER,
        view.campaign.id,
    )
    .await
    .unwrap_err();
    assert_matches!(err, CoreError::InvalidState(_));
}

#[sqlx::test(migrations = "../../migrations")]
async fn invalid_application_status_does_not_mutate(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;
    let app =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap();

    let input = UpdateApplicationStatus {
        status: "approved".to_string(),
        notes: None,
        brand_id: Some(BRAND),
    };
    let err = ApplicationService::update_application_status(&pool, app.id, &input)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));

    let unchanged = ApplicationService::get_application(&pool, app.id).await.unwrap();
    assert_eq!(unchanged.status, "pending");
    assert!(unchanged.status_updated_at.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn brand_authorization_is_checked_against_the_owning_campaign(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;
    let app =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap();

    // A different brand cannot transition the application.
    let input = UpdateApplicationStatus {
        status: "accepted".to_string(),
        notes: None,
        brand_id: Some(OTHER_BRAND),
    };
    let err = ApplicationService::update_application_status(&pool, app.id, &input)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Unauthorized(_));

    // The owning brand can.
    let input = UpdateApplicationStatus {
        brand_id: Some(BRAND),
        ..input
    };
    let accepted = ApplicationService::update_application_status(&pool, app.id, &input)
        .await
        .unwrap();
    assert_eq!(accepted.status, "accepted");
}

#[sqlx::test(migrations = "../../migrations")]
async fn acceptance_links_the_influencer_into_the_campaign(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;
    let app =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap();

    let input = UpdateApplicationStatus {
        status: "accepted".to_string(),
        notes: None,
        brand_id: Some(BRAND),
    };
    ApplicationService::update_application_status(&pool, app.id, &input)
        .await
        .unwrap();

    let campaign = CampaignService::get_campaign(&pool, campaign_id).await.unwrap();
    assert_eq!(campaign.selected_influencers, vec![INFLUENCER]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn accepted_applications_cannot_be_withdrawn(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;
    let app =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap();

    let input = UpdateApplicationStatus {
        status: "accepted".to_string(),
        notes: None,
        brand_id: Some(BRAND),
    };
    ApplicationService::update_application_status(&pool, app.id, &input)
        .await
        .unwrap();

    let err = ApplicationService::withdraw_application(&pool, app.id, INFLUENCER)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidState(_));
}

#[sqlx::test(migrations = "../../migrations")]
async fn only_the_applicant_can_withdraw_or_edit(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;
    let app =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap();

    let err = ApplicationService::withdraw_application(&pool, app.id, 99)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Unauthorized(_));

    let changes = UpdateApplication {
        notes: Some("updated".to_string()),
        ..Default::default()
    };
    let err = ApplicationService::update_application(&pool, app.id, &changes, 99)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Unauthorized(_));
}

#[sqlx::test(migrations = "../../migrations")]
async fn edits_are_pending_only(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;
    let app =
        ApplicationService::create_application(&pool, &application_input(), INFLUENCER, campaign_id)
            .await
            .unwrap();

    let changes = UpdateApplication {
        proposed_rate: Some(200.0),
        ..Default::default()
    };
    let updated = ApplicationService::update_application(&pool, app.id, &changes, INFLUENCER)
        .await
        .unwrap();
    assert_eq!(updated.proposed_rate, Some(200.0));

    let input = UpdateApplicationStatus {
        status: "rejected".to_string(),
        notes: None,
        brand_id: Some(BRAND),
    };
    ApplicationService::update_application_status(&pool, app.id, &input)
        .await
        .unwrap();

    let err = ApplicationService::update_application(&pool, app.id, &changes, INFLUENCER)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidState(_));
}

#[sqlx::test(migrations = "../../migrations")]
async fn bulk_update_aborts_before_writing_when_any_id_fails_the_check(pool: PgPool) {
    let own_campaign = seed_active_campaign(&pool, BRAND).await;
    let foreign_campaign = seed_active_campaign(&pool, OTHER_BRAND).await;

    let own_app =
        ApplicationService::create_application(&pool, &application_input(), 10, own_campaign)
            .await
            .unwrap();
    let foreign_app =
        ApplicationService::create_application(&pool, &application_input(), 11, foreign_campaign)
            .await
            .unwrap();

    let input = BulkUpdateApplicationStatus {
        ids: vec![own_app.id, foreign_app.id],
        status: "rejected".to_string(),
        notes: None,
        brand_id: BRAND,
    };
    let err = ApplicationService::bulk_update_status(&pool, &input)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Unauthorized(_));

    // The whole batch aborted before any write: the owned application is
    // still pending.
    let untouched = ApplicationService::get_application(&pool, own_app.id).await.unwrap();
    assert_eq!(untouched.status, "pending");
}

#[sqlx::test(migrations = "../../migrations")]
async fn batch_edits_are_authorized_per_id_before_committing(pool: PgPool) {
    let own_campaign = seed_active_campaign(&pool, BRAND).await;
    let foreign_campaign = seed_active_campaign(&pool, OTHER_BRAND).await;

    let own_app =
        ApplicationService::create_application(&pool, &application_input(), 10, own_campaign)
            .await
            .unwrap();
    let foreign_app =
        ApplicationService::create_application(&pool, &application_input(), 11, foreign_campaign)
            .await
            .unwrap();

    let edit = |id| BatchApplicationEdit {
        id,
        changes: UpdateApplication {
            notes: Some("Shortlisted".to_string()),
            ..Default::default()
        },
    };

    // A foreign application in the batch aborts everything.
    let input = BatchUpdateApplications {
        brand_id: BRAND,
        updates: vec![edit(own_app.id), edit(foreign_app.id)],
    };
    let err = ApplicationService::batch_update_applications(&pool, &input)
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Unauthorized(_));

    let untouched = ApplicationService::get_application(&pool, own_app.id).await.unwrap();
    assert_eq!(untouched.notes, None);

    // Restricted to owned applications, the batch commits.
    let input = BatchUpdateApplications {
        brand_id: BRAND,
        updates: vec![edit(own_app.id)],
    };
    let updated = ApplicationService::batch_update_applications(&pool, &input)
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let edited = ApplicationService::get_application(&pool, own_app.id).await.unwrap();
    assert_eq!(edited.notes.as_deref(), Some("Shortlisted"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn bulk_update_applies_to_every_authorized_id(pool: PgPool) {
    let campaign_id = seed_active_campaign(&pool, BRAND).await;
    let a = ApplicationService::create_application(&pool, &application_input(), 10, campaign_id)
        .await
        .unwrap();
    let b = ApplicationService::create_application(&pool, &application_input(), 11, campaign_id)
        .await
        .unwrap();

    let input = BulkUpdateApplicationStatus {
        ids: vec![a.id, b.id],
        status: "rejected".to_string(),
        notes: Some("Round closed".to_string()),
        brand_id: BRAND,
    };
    let updated = ApplicationService::bulk_update_status(&pool, &input).await.unwrap();
    assert_eq!(updated, 2);

    let stats = ApplicationService::get_campaign_application_stats(&pool, campaign_id)
        .await
        .unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.rejected, 2);
    assert_eq!(stats.average_proposed_rate, Some(150.0));
}
