//! Campaign lifecycle manager.
//!
//! Enforces campaign invariants around [`CampaignRepo`]: collect-all-fields
//! creation validation, budget normalization, status enum closure with
//! lifecycle stamps, best-effort counters, and the public-listing rule that
//! browsing influencers only ever see `active` campaigns.

use serde::Serialize;
use sqlx::PgPool;
use validator::{Validate, ValidationError, ValidationErrors};

use reachly_core::campaign::{self, STATUS_DRAFT, URGENCY_MEDIUM};
use reachly_core::error::CoreError;
use reachly_core::filter::{matches_search, CampaignFilters};
use reachly_core::money::format_budget;
use reachly_core::query::CampaignQuery;
use reachly_core::types::DbId;
use reachly_db::error::classify;
use reachly_db::models::campaign::{
    Campaign, CampaignChanges, CreateCampaign, NewCampaign, UpdateCampaign,
};
use reachly_db::repositories::CampaignRepo;

/// A campaign in display form: the stored row plus the budget re-formatted
/// as a currency string for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignView {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub budget_display: String,
}

impl From<Campaign> for CampaignView {
    fn from(campaign: Campaign) -> Self {
        let budget_display = format_budget(campaign.budget);
        Self {
            campaign,
            budget_display,
        }
    }
}

/// Campaign lifecycle operations. The sole writer of campaign derived
/// counters and the selected-influencers set.
pub struct CampaignService;

impl CampaignService {
    /// Validate and create a campaign owned by `brand_id`.
    ///
    /// The validation error names every missing or invalid field, not just
    /// the first one.
    pub async fn create_campaign(
        pool: &PgPool,
        input: &CreateCampaign,
        brand_id: DbId,
    ) -> Result<CampaignView, CoreError> {
        let new = validate_create(input)?;
        let created = CampaignRepo::create(pool, brand_id, &new)
            .await
            .map_err(classify)?;

        tracing::info!(
            campaign_id = created.id,
            brand_id,
            status = %created.status,
            "Campaign created",
        );
        Ok(CampaignView::from(created))
    }

    /// Merge-update campaign fields, re-normalizing the budget when present.
    pub async fn update_campaign(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Campaign, CoreError> {
        let budget = match input.budget {
            Some(ref raw) => Some(
                raw.normalize()
                    .map_err(|e| CoreError::Validation(format!("budget: {e}")))?,
            ),
            None => None,
        };
        if let Some(ref urgency) = input.urgency {
            campaign::validate_urgency(urgency)?;
        }

        let changes = CampaignChanges {
            title: input.title.clone(),
            description: input.description.clone(),
            category: input.category.clone(),
            budget,
            deadline: input.deadline,
            location: input.location.clone(),
            is_remote: input.is_remote,
            content_types: input.content_types.clone(),
            min_followers: input.min_followers,
            urgency: input.urgency.clone(),
        };
        CampaignRepo::update(pool, id, &changes)
            .await
            .map_err(classify)?
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id,
            })
    }

    /// Set the campaign status. Rejects values outside the fixed enumeration
    /// without touching the entity; stamps activation/completion times.
    pub async fn update_campaign_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Campaign, CoreError> {
        campaign::validate_status(status)?;
        let updated = CampaignRepo::update_status(pool, id, status)
            .await
            .map_err(classify)?
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id,
            })?;

        tracing::info!(campaign_id = id, status, "Campaign status updated");
        Ok(updated)
    }

    /// Bump the view counter. Best-effort telemetry: failures are logged and
    /// swallowed, never propagated to the caller.
    pub async fn increment_views(pool: &PgPool, id: DbId) -> bool {
        match CampaignRepo::increment_views(pool, id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(campaign_id = id, error = %e, "View counter update failed");
                false
            }
        }
    }

    /// Bump the applications counter. Best-effort, like
    /// [`increment_views`](Self::increment_views).
    pub async fn increment_applications(pool: &PgPool, id: DbId) -> bool {
        match CampaignRepo::increment_applications(pool, id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    campaign_id = id,
                    error = %e,
                    "Applications counter update failed",
                );
                false
            }
        }
    }

    /// Add an influencer to the campaign's selected set (duplicate-safe).
    pub async fn add_selected_influencer(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, CoreError> {
        CampaignRepo::add_selected_influencer(pool, id, influencer_id)
            .await
            .map_err(classify)
    }

    /// Remove an influencer from the campaign's selected set.
    pub async fn remove_selected_influencer(
        pool: &PgPool,
        id: DbId,
        influencer_id: DbId,
    ) -> Result<bool, CoreError> {
        CampaignRepo::remove_selected_influencer(pool, id, influencer_id)
            .await
            .map_err(classify)
    }

    /// Fetch a single campaign.
    pub async fn get_campaign(pool: &PgPool, id: DbId) -> Result<Campaign, CoreError> {
        CampaignRepo::find_by_id(pool, id)
            .await
            .map_err(classify)?
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id,
            })
    }

    /// List campaigns for the owning (brand) side.
    pub async fn list_campaigns(
        pool: &PgPool,
        query: &CampaignQuery,
    ) -> Result<Vec<Campaign>, CoreError> {
        CampaignRepo::list_filtered(pool, &query.descriptor())
            .await
            .map_err(classify)
    }

    /// List campaigns for the browsing (influencer) side.
    ///
    /// Forces `status = active` regardless of the caller's filters, so
    /// non-active campaigns are never visible here.
    pub async fn get_public_campaigns(
        pool: &PgPool,
        query: &CampaignQuery,
    ) -> Result<Vec<Campaign>, CoreError> {
        CampaignRepo::list_filtered(pool, &query.public_descriptor())
            .await
            .map_err(classify)
    }

    /// Keyword search over the public set: case-insensitive substring match
    /// against title, description, category, and content types, evaluated
    /// in memory.
    pub async fn search_campaigns(
        pool: &PgPool,
        term: &str,
        query: &CampaignQuery,
    ) -> Result<Vec<Campaign>, CoreError> {
        let mut campaigns = Self::get_public_campaigns(pool, query).await?;
        campaigns.retain(|c| matches_search(term, c));
        Ok(campaigns)
    }

    /// Browse the public set through the multi-criteria filter state.
    pub async fn browse_campaigns(
        pool: &PgPool,
        query: &CampaignQuery,
        filters: &CampaignFilters,
    ) -> Result<Vec<Campaign>, CoreError> {
        let campaigns = Self::get_public_campaigns(pool, query).await?;
        Ok(filters.apply(campaigns))
    }

    /// Clone a campaign's content into a fresh draft owned by `brand_id`.
    ///
    /// Identity, timestamps, counters, and the selected set are not copied.
    pub async fn duplicate_campaign(
        pool: &PgPool,
        id: DbId,
        brand_id: DbId,
    ) -> Result<CampaignView, CoreError> {
        let source = Self::get_campaign(pool, id).await?;
        let new = NewCampaign {
            title: source.title,
            description: source.description,
            category: source.category,
            budget: source.budget,
            deadline: source.deadline,
            status: STATUS_DRAFT.to_string(),
            location: source.location,
            is_remote: source.is_remote,
            content_types: source.content_types,
            min_followers: source.min_followers,
            urgency: source.urgency,
        };
        let created = CampaignRepo::create(pool, brand_id, &new)
            .await
            .map_err(classify)?;

        tracing::info!(
            campaign_id = created.id,
            source_campaign_id = id,
            brand_id,
            "Campaign duplicated",
        );
        Ok(CampaignView::from(created))
    }

    /// Hard-delete a campaign after verifying ownership.
    pub async fn delete_campaign(
        pool: &PgPool,
        id: DbId,
        brand_id: DbId,
    ) -> Result<(), CoreError> {
        let existing = Self::get_campaign(pool, id).await?;
        if existing.brand_id != brand_id {
            return Err(CoreError::Unauthorized(
                "You can only delete your own campaigns".to_string(),
            ));
        }
        CampaignRepo::delete(pool, id).await.map_err(classify)?;
        tracing::info!(campaign_id = id, brand_id, "Campaign deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Creation validation
// ---------------------------------------------------------------------------

/// Validate a creation request, reporting every failing field at once, and
/// resolve it into the insert payload.
fn validate_create(input: &CreateCampaign) -> Result<NewCampaign, CoreError> {
    let mut problems: Vec<String> = Vec::new();

    if let Err(errors) = input.validate() {
        problems.extend(describe_validation_errors(&errors));
    }

    let budget = match input.budget.as_ref().map(|b| b.normalize()) {
        Some(Ok(amount)) => Some(amount),
        Some(Err(reason)) => {
            problems.push(format!("budget: {reason}"));
            None
        }
        // Absence is already reported by the `required` rule above.
        None => None,
    };

    let status = input
        .status
        .clone()
        .unwrap_or_else(|| STATUS_DRAFT.to_string());
    if let Err(CoreError::Validation(msg)) = campaign::validate_create_status(&status) {
        problems.push(msg);
    }

    let urgency = input
        .urgency
        .clone()
        .unwrap_or_else(|| URGENCY_MEDIUM.to_string());
    if let Err(CoreError::Validation(msg)) = campaign::validate_urgency(&urgency) {
        problems.push(msg);
    }

    if !problems.is_empty() {
        return Err(CoreError::Validation(problems.join("; ")));
    }

    let budget = budget.ok_or_else(|| CoreError::Validation("budget is required".to_string()))?;

    Ok(NewCampaign {
        title: input.title.clone().unwrap_or_default(),
        description: input.description.clone().unwrap_or_default(),
        category: input.category.clone().unwrap_or_default(),
        budget,
        deadline: input.deadline,
        status,
        location: input.location.clone(),
        is_remote: input.is_remote.unwrap_or(false),
        content_types: input.content_types.clone().unwrap_or_default(),
        min_followers: input.min_followers.unwrap_or(0).max(0),
        urgency,
    })
}

/// Flatten validator output into one deterministic message per field.
fn describe_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let field: &str = field.as_ref();
            describe_field(field, field_errors)
        })
        .collect();
    messages.sort();
    messages
}

fn describe_field(field: &str, errors: &[ValidationError]) -> String {
    let code = errors
        .first()
        .map(|e| e.code.as_ref())
        .unwrap_or("invalid");
    match code {
        "required" => format!("{field} is required"),
        "length" => format!("{field} must not be empty"),
        "range" => format!("{field} must be positive"),
        _ => format!("{field} is invalid"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
