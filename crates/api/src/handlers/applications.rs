//! Handlers for the application lifecycle.
//!
//! Actor context (`user_id` / `brand_id`) travels explicitly in request
//! bodies; the supplied identity is trusted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use reachly_core::types::DbId;
use reachly_db::models::application::{
    BatchUpdateApplications, BulkUpdateApplicationStatus, CreateApplication, UpdateApplication,
    UpdateApplicationStatus,
};
use reachly_events::MarketEvent;
use reachly_services::ApplicationService;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /applications`.
#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub user_id: DbId,
    pub campaign_id: DbId,
    #[serde(flatten)]
    pub application: CreateApplication,
}

/// Body for `PUT /applications/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub user_id: DbId,
    #[serde(flatten)]
    pub changes: UpdateApplication,
}

/// Body for `POST /applications/{id}/withdraw`.
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub user_id: DbId,
}

// ---------------------------------------------------------------------------
// POST /applications
// ---------------------------------------------------------------------------

/// Submit an application to a campaign.
pub async fn create_application(
    State(state): State<AppState>,
    Json(input): Json<CreateApplicationRequest>,
) -> AppResult<impl IntoResponse> {
    let application = ApplicationService::create_application(
        &state.pool,
        &input.application,
        input.user_id,
        input.campaign_id,
    )
    .await?;

    state.event_bus.publish(
        MarketEvent::application("application.submitted", application.id)
            .with_actor(input.user_id),
    );
    // The campaign's applications counter changed; refresh its feeds.
    state
        .event_bus
        .publish(MarketEvent::campaign("campaign.updated", input.campaign_id));

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

// ---------------------------------------------------------------------------
// GET /applications/{id}
// ---------------------------------------------------------------------------

/// Get a single application by ID.
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = ApplicationService::get_application(&state.pool, id).await?;
    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// PUT /applications/{id}
// ---------------------------------------------------------------------------

/// Apply applicant edits to a pending application.
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateApplicationRequest>,
) -> AppResult<impl IntoResponse> {
    let application =
        ApplicationService::update_application(&state.pool, id, &input.changes, input.user_id)
            .await?;
    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// PUT /applications/{id}/status
// ---------------------------------------------------------------------------

/// Change an application's status. Acceptance links the applicant into the
/// campaign's selected set.
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateApplicationStatus>,
) -> AppResult<impl IntoResponse> {
    let application =
        ApplicationService::update_application_status(&state.pool, id, &input).await?;

    state.event_bus.publish(
        MarketEvent::application("application.status_changed", id)
            .with_payload(serde_json::json!({ "status": application.status })),
    );
    state.event_bus.publish(MarketEvent::campaign(
        "campaign.updated",
        application.campaign_id,
    ));

    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// POST /applications/{id}/withdraw
// ---------------------------------------------------------------------------

/// Withdraw an application on behalf of its applicant.
pub async fn withdraw_application(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<WithdrawRequest>,
) -> AppResult<impl IntoResponse> {
    let application =
        ApplicationService::withdraw_application(&state.pool, id, input.user_id).await?;

    state.event_bus.publish(
        MarketEvent::application("application.withdrawn", id).with_actor(input.user_id),
    );

    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// PUT /applications/bulk/status
// ---------------------------------------------------------------------------

/// Change the status of several applications owned by one brand.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(input): Json<BulkUpdateApplicationStatus>,
) -> AppResult<impl IntoResponse> {
    let updated = ApplicationService::bulk_update_status(&state.pool, &input).await?;

    state.event_bus.publish(
        MarketEvent::new("application.bulk_status")
            .with_actor(input.brand_id)
            .with_payload(serde_json::json!({
                "ids": input.ids,
                "status": input.status,
            })),
    );

    Ok(Json(DataResponse {
        data: serde_json::json!({ "updated": updated }),
    }))
}

// ---------------------------------------------------------------------------
// PUT /applications/batch
// ---------------------------------------------------------------------------

/// Apply field edits to several applications owned by one brand.
pub async fn batch_update_applications(
    State(state): State<AppState>,
    Json(input): Json<BatchUpdateApplications>,
) -> AppResult<impl IntoResponse> {
    let updated = ApplicationService::batch_update_applications(&state.pool, &input).await?;

    Ok(Json(DataResponse {
        data: serde_json::json!({ "updated": updated }),
    }))
}

// ---------------------------------------------------------------------------
// GET /users/{user_id}/applications
// ---------------------------------------------------------------------------

/// List the applications a user has submitted.
pub async fn user_applications(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let applications = ApplicationService::get_user_applications(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: applications }))
}

// ---------------------------------------------------------------------------
// GET /users/{user_id}/applications/stats
// ---------------------------------------------------------------------------

/// Aggregate statistics over a user's applications.
pub async fn user_application_stats(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let stats = ApplicationService::get_user_application_stats(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}
