//! Handlers for campaign lifecycle and discovery.
//!
//! Actor context (`brand_id`) travels explicitly in request bodies or query
//! parameters; the upstream authentication provider is out of scope and the
//! supplied identity is trusted.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use reachly_core::filter::CampaignFilters;
use reachly_core::query::CampaignQuery;
use reachly_core::types::DbId;
use reachly_db::models::campaign::{CreateCampaign, UpdateCampaign, UpdateCampaignStatus};
use reachly_events::MarketEvent;
use reachly_services::{ApplicationService, CampaignService};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /campaigns`.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub brand_id: DbId,
    #[serde(flatten)]
    pub campaign: CreateCampaign,
}

/// Body for `POST /campaigns/{id}/duplicate`.
#[derive(Debug, Deserialize)]
pub struct DuplicateCampaignRequest {
    pub brand_id: DbId,
}

/// Query for `DELETE /campaigns/{id}`.
#[derive(Debug, Deserialize)]
pub struct OwnerParams {
    pub brand_id: DbId,
}

/// Query for `GET /campaigns/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// POST /campaigns
// ---------------------------------------------------------------------------

/// Create a campaign. Returns the campaign in display form.
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaignRequest>,
) -> AppResult<impl IntoResponse> {
    let view =
        CampaignService::create_campaign(&state.pool, &input.campaign, input.brand_id).await?;

    state.event_bus.publish(
        MarketEvent::campaign("campaign.created", view.campaign.id).with_actor(input.brand_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /campaigns
// ---------------------------------------------------------------------------

/// List campaigns for the owning (brand) side.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> AppResult<impl IntoResponse> {
    let campaigns = CampaignService::list_campaigns(&state.pool, &query).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

// ---------------------------------------------------------------------------
// GET /campaigns/public
// ---------------------------------------------------------------------------

/// List active campaigns for the browsing (influencer) side.
pub async fn public_campaigns(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> AppResult<impl IntoResponse> {
    let campaigns = CampaignService::get_public_campaigns(&state.pool, &query).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

// ---------------------------------------------------------------------------
// POST /campaigns/browse
// ---------------------------------------------------------------------------

/// Browse active campaigns through the multi-criteria filter state.
pub async fn browse_campaigns(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
    Json(filters): Json<CampaignFilters>,
) -> AppResult<impl IntoResponse> {
    let campaigns = CampaignService::browse_campaigns(&state.pool, &query, &filters).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

// ---------------------------------------------------------------------------
// GET /campaigns/search
// ---------------------------------------------------------------------------

/// Keyword search over active campaigns.
pub async fn search_campaigns(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let query = CampaignQuery {
        category: params.category,
        limit: params.limit,
        ..Default::default()
    };
    let campaigns = CampaignService::search_campaigns(&state.pool, &params.q, &query).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

// ---------------------------------------------------------------------------
// GET /campaigns/{id}
// ---------------------------------------------------------------------------

/// Get a single campaign by ID.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignService::get_campaign(&state.pool, id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

// ---------------------------------------------------------------------------
// PUT /campaigns/{id}
// ---------------------------------------------------------------------------

/// Merge-update campaign fields.
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignService::update_campaign(&state.pool, id, &input).await?;

    state
        .event_bus
        .publish(MarketEvent::campaign("campaign.updated", id));

    Ok(Json(DataResponse { data: campaign }))
}

// ---------------------------------------------------------------------------
// PUT /campaigns/{id}/status
// ---------------------------------------------------------------------------

/// Set the campaign status, stamping lifecycle timestamps.
pub async fn update_campaign_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaignStatus>,
) -> AppResult<impl IntoResponse> {
    let campaign =
        CampaignService::update_campaign_status(&state.pool, id, &input.status).await?;

    state.event_bus.publish(
        MarketEvent::campaign("campaign.status_changed", id)
            .with_payload(serde_json::json!({ "status": input.status })),
    );

    Ok(Json(DataResponse { data: campaign }))
}

// ---------------------------------------------------------------------------
// POST /campaigns/{id}/views
// ---------------------------------------------------------------------------

/// Record a view. Best-effort: always returns 204.
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> StatusCode {
    CampaignService::increment_views(&state.pool, id).await;
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// POST /campaigns/{id}/duplicate
// ---------------------------------------------------------------------------

/// Clone a campaign's content into a fresh draft.
pub async fn duplicate_campaign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DuplicateCampaignRequest>,
) -> AppResult<impl IntoResponse> {
    let view = CampaignService::duplicate_campaign(&state.pool, id, input.brand_id).await?;

    state.event_bus.publish(
        MarketEvent::campaign("campaign.created", view.campaign.id).with_actor(input.brand_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// DELETE /campaigns/{id}
// ---------------------------------------------------------------------------

/// Hard-delete a campaign after verifying ownership.
pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<OwnerParams>,
) -> AppResult<impl IntoResponse> {
    CampaignService::delete_campaign(&state.pool, id, params.brand_id).await?;

    state
        .event_bus
        .publish(MarketEvent::campaign("campaign.deleted", id).with_actor(params.brand_id));

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /campaigns/{id}/applications
// ---------------------------------------------------------------------------

/// List the applications a campaign has received.
pub async fn campaign_applications(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let applications = ApplicationService::get_campaign_applications(&state.pool, id).await?;
    Ok(Json(DataResponse { data: applications }))
}

// ---------------------------------------------------------------------------
// GET /campaigns/{id}/applications/stats
// ---------------------------------------------------------------------------

/// Aggregate statistics over a campaign's applications.
pub async fn campaign_application_stats(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let stats = ApplicationService::get_campaign_application_stats(&state.pool, id).await?;
    Ok(Json(DataResponse { data: stats }))
}
