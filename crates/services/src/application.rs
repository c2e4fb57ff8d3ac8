//! Application lifecycle manager.
//!
//! Enforces the one-live-application-per-user-per-campaign rule, ownership
//! checks on status changes, the transactional acceptance side effect, and
//! pending-only applicant edits. Campaign counters touched here are
//! best-effort and never fail the parent operation.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use validator::Validate;

use reachly_core::application::{
    self, STATUS_ACCEPTED, STATUS_COMPLETED, STATUS_PENDING, STATUS_REJECTED, STATUS_WITHDRAWN,
};
use reachly_core::campaign::STATUS_ACTIVE;
use reachly_core::error::CoreError;
use reachly_core::query::{FilterDescriptor, FilterValue};
use reachly_core::types::DbId;
use reachly_db::error::classify;
use reachly_db::models::application::{
    Application, BatchUpdateApplications, BulkUpdateApplicationStatus, CreateApplication,
    NewApplication, UpdateApplication, UpdateApplicationStatus,
};
use reachly_db::repositories::{ApplicationRepo, CampaignRepo};

use crate::campaign::CampaignService;

/// Aggregated counts over a set of applications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub withdrawn: usize,
    pub completed: usize,
    /// Mean of the proposed rates, excluding missing and non-positive
    /// values. `None` when no application carries a usable rate.
    pub average_proposed_rate: Option<f64>,
}

/// Pure aggregation over a fetched application list.
pub fn aggregate_stats(applications: &[Application]) -> ApplicationStats {
    let count_status =
        |status: &str| applications.iter().filter(|a| a.status == status).count();

    let rates: Vec<f64> = applications
        .iter()
        .filter_map(|a| a.proposed_rate)
        .filter(|r| *r > 0.0)
        .collect();
    let average_proposed_rate = if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    };

    ApplicationStats {
        total: applications.len(),
        pending: count_status(STATUS_PENDING),
        accepted: count_status(STATUS_ACCEPTED),
        rejected: count_status(STATUS_REJECTED),
        withdrawn: count_status(STATUS_WITHDRAWN),
        completed: count_status(STATUS_COMPLETED),
        average_proposed_rate,
    }
}

/// Application lifecycle operations.
pub struct ApplicationService;

impl ApplicationService {
    /// Submit an application from `user_id` to `campaign_id`.
    ///
    /// Fails with Duplicate when the user already has a non-withdrawn
    /// application on the campaign; the partial unique index backstops the
    /// check under concurrent submissions. The campaign's applications
    /// counter is bumped best-effort after the create.
    pub async fn create_application(
        pool: &PgPool,
        input: &CreateApplication,
        user_id: DbId,
        campaign_id: DbId,
    ) -> Result<Application, CoreError> {
        let new = validate_create(input)?;

        let campaign = CampaignRepo::find_by_id(pool, campaign_id)
            .await
            .map_err(classify)?
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id: campaign_id,
            })?;
        if campaign.status != STATUS_ACTIVE {
            return Err(CoreError::InvalidState(
                "This campaign is not open for applications".to_string(),
            ));
        }

        let existing =
            ApplicationRepo::find_active_by_user_and_campaign(pool, user_id, campaign_id)
                .await
                .map_err(classify)?;
        if existing.is_some() {
            return Err(CoreError::Duplicate(
                "You have already applied to this campaign".to_string(),
            ));
        }

        let created = ApplicationRepo::create(pool, campaign_id, user_id, &new)
            .await
            .map_err(classify)?;

        // Best-effort counter: a failure here must not fail the create.
        CampaignService::increment_applications(pool, campaign_id).await;

        tracing::info!(
            application_id = created.id,
            campaign_id,
            user_id,
            "Application submitted",
        );
        Ok(created)
    }

    /// Change an application's status.
    ///
    /// When `brand_id` is supplied, the brand must own the campaign the
    /// application references. Acceptance runs transactionally and links the
    /// applicant into the campaign's selected set.
    pub async fn update_application_status(
        pool: &PgPool,
        id: DbId,
        input: &UpdateApplicationStatus,
    ) -> Result<Application, CoreError> {
        application::validate_status(&input.status)?;

        let current = Self::get_application(pool, id).await?;

        if let Some(brand_id) = input.brand_id {
            let campaign = CampaignRepo::find_by_id(pool, current.campaign_id)
                .await
                .map_err(classify)?
                .ok_or(CoreError::NotFound {
                    entity: "Campaign",
                    id: current.campaign_id,
                })?;
            if campaign.brand_id != brand_id {
                return Err(CoreError::Unauthorized(
                    "This application belongs to a campaign owned by another brand".to_string(),
                ));
            }
        }

        let notes = input.notes.as_deref();
        let updated = if input.status == STATUS_ACCEPTED {
            ApplicationRepo::accept(pool, id, notes).await
        } else {
            ApplicationRepo::update_status(pool, id, &input.status, notes).await
        }
        .map_err(classify)?
        .ok_or(CoreError::NotFound {
            entity: "Application",
            id,
        })?;

        tracing::info!(
            application_id = id,
            from = %current.status,
            to = %updated.status,
            "Application status updated",
        );
        Ok(updated)
    }

    /// Withdraw an application on behalf of its applicant.
    ///
    /// An accepted application cannot be withdrawn; the brand has to be
    /// contacted instead.
    pub async fn withdraw_application(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Application, CoreError> {
        let current = Self::get_application(pool, id).await?;
        if current.user_id != user_id {
            return Err(CoreError::Unauthorized(
                "You can only withdraw your own applications".to_string(),
            ));
        }
        application::validate_withdrawal(&current.status)?;

        let updated = ApplicationRepo::update_status(pool, id, STATUS_WITHDRAWN, None)
            .await
            .map_err(classify)?
            .ok_or(CoreError::NotFound {
                entity: "Application",
                id,
            })?;

        tracing::info!(application_id = id, user_id, "Application withdrawn");
        Ok(updated)
    }

    /// Apply applicant edits. Only permitted while the application is
    /// pending; the DTO's fields are the allow-list, anything else a caller
    /// submits never reaches the store.
    pub async fn update_application(
        pool: &PgPool,
        id: DbId,
        input: &UpdateApplication,
        user_id: DbId,
    ) -> Result<Application, CoreError> {
        let current = Self::get_application(pool, id).await?;
        if current.user_id != user_id {
            return Err(CoreError::Unauthorized(
                "You can only edit your own applications".to_string(),
            ));
        }
        application::validate_editable(&current.status)?;

        if let Some(ref cover_letter) = input.cover_letter {
            if cover_letter.is_empty() {
                return Err(CoreError::Validation(
                    "cover_letter must not be empty".to_string(),
                ));
            }
        }
        if let Some(rate) = input.proposed_rate {
            if rate <= 0.0 {
                return Err(CoreError::Validation(
                    "proposed_rate must be positive".to_string(),
                ));
            }
        }

        // The repo re-checks the pending guard inside the UPDATE, so a
        // status change racing past the check above cannot slip an edit in.
        ApplicationRepo::update_pending(pool, id, input)
            .await
            .map_err(classify)?
            .ok_or_else(|| {
                CoreError::InvalidState(
                    "Applications can only be edited while pending".to_string(),
                )
            })
    }

    /// Change the status of several applications owned by one brand.
    ///
    /// Every id is authorized up front (one fetch each); any failure aborts
    /// the whole call before a single write is issued. Acceptances run
    /// per-application so the campaign side effect holds for each; other
    /// statuses go out as one batched write.
    pub async fn bulk_update_status(
        pool: &PgPool,
        input: &BulkUpdateApplicationStatus,
    ) -> Result<u64, CoreError> {
        application::validate_status(&input.status)?;
        if input.ids.is_empty() {
            return Ok(0);
        }

        let mut campaign_owners: HashMap<DbId, DbId> = HashMap::new();
        for &id in &input.ids {
            let app = Self::get_application(pool, id).await?;
            let owner = match campaign_owners.get(&app.campaign_id) {
                Some(owner) => *owner,
                None => {
                    let campaign = CampaignRepo::find_by_id(pool, app.campaign_id)
                        .await
                        .map_err(classify)?
                        .ok_or(CoreError::NotFound {
                            entity: "Campaign",
                            id: app.campaign_id,
                        })?;
                    campaign_owners.insert(campaign.id, campaign.brand_id);
                    campaign.brand_id
                }
            };
            if owner != input.brand_id {
                return Err(CoreError::Unauthorized(format!(
                    "Application {id} belongs to a campaign owned by another brand"
                )));
            }
        }

        let notes = input.notes.as_deref();
        let updated = if input.status == STATUS_ACCEPTED {
            let mut count = 0u64;
            for &id in &input.ids {
                if ApplicationRepo::accept(pool, id, notes)
                    .await
                    .map_err(classify)?
                    .is_some()
                {
                    count += 1;
                }
            }
            count
        } else {
            ApplicationRepo::batch_update_status(pool, &input.ids, &input.status, notes)
                .await
                .map_err(classify)?
        };

        tracing::info!(
            count = updated,
            status = %input.status,
            brand_id = input.brand_id,
            "Bulk application status update",
        );
        Ok(updated)
    }

    /// Apply field edits to several applications owned by one brand.
    ///
    /// Like [`bulk_update_status`](Self::bulk_update_status), every id is
    /// authorized before any write; the edits then commit as a single
    /// transaction.
    pub async fn batch_update_applications(
        pool: &PgPool,
        input: &BatchUpdateApplications,
    ) -> Result<u64, CoreError> {
        if input.updates.is_empty() {
            return Ok(0);
        }

        let mut campaign_owners: HashMap<DbId, DbId> = HashMap::new();
        for edit in &input.updates {
            let app = Self::get_application(pool, edit.id).await?;
            let owner = match campaign_owners.get(&app.campaign_id) {
                Some(owner) => *owner,
                None => {
                    let campaign = CampaignRepo::find_by_id(pool, app.campaign_id)
                        .await
                        .map_err(classify)?
                        .ok_or(CoreError::NotFound {
                            entity: "Campaign",
                            id: app.campaign_id,
                        })?;
                    campaign_owners.insert(campaign.id, campaign.brand_id);
                    campaign.brand_id
                }
            };
            if owner != input.brand_id {
                return Err(CoreError::Unauthorized(format!(
                    "Application {} belongs to a campaign owned by another brand",
                    edit.id
                )));
            }
        }

        let updates: Vec<(DbId, UpdateApplication)> = input
            .updates
            .iter()
            .map(|edit| (edit.id, edit.changes.clone()))
            .collect();
        let updated = ApplicationRepo::batch_update(pool, &updates)
            .await
            .map_err(classify)?;

        tracing::info!(
            count = updated,
            brand_id = input.brand_id,
            "Batch application update",
        );
        Ok(updated)
    }

    /// Fetch a single application.
    pub async fn get_application(pool: &PgPool, id: DbId) -> Result<Application, CoreError> {
        ApplicationRepo::find_by_id(pool, id)
            .await
            .map_err(classify)?
            .ok_or(CoreError::NotFound {
                entity: "Application",
                id,
            })
    }

    /// List all applications submitted by a user.
    pub async fn get_user_applications(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Application>, CoreError> {
        let descriptor =
            FilterDescriptor::new().with_eq("user_id", FilterValue::Id(user_id));
        ApplicationRepo::list_filtered(pool, &descriptor)
            .await
            .map_err(classify)
    }

    /// List all applications received by a campaign.
    pub async fn get_campaign_applications(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Application>, CoreError> {
        let descriptor =
            FilterDescriptor::new().with_eq("campaign_id", FilterValue::Id(campaign_id));
        ApplicationRepo::list_filtered(pool, &descriptor)
            .await
            .map_err(classify)
    }

    /// Aggregate statistics over a user's applications.
    pub async fn get_user_application_stats(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<ApplicationStats, CoreError> {
        let applications = Self::get_user_applications(pool, user_id).await?;
        Ok(aggregate_stats(&applications))
    }

    /// Aggregate statistics over a campaign's applications.
    pub async fn get_campaign_application_stats(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<ApplicationStats, CoreError> {
        let applications = Self::get_campaign_applications(pool, campaign_id).await?;
        Ok(aggregate_stats(&applications))
    }
}

// ---------------------------------------------------------------------------
// Creation validation
// ---------------------------------------------------------------------------

/// Validate a submission, reporting every failing field at once, and resolve
/// it into the insert payload.
fn validate_create(input: &CreateApplication) -> Result<NewApplication, CoreError> {
    if let Err(errors) = input.validate() {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let field: &str = field.as_ref();
                let code = field_errors
                    .first()
                    .map(|e| e.code.as_ref())
                    .unwrap_or("invalid");
                match code {
                    "required" => format!("{field} is required"),
                    "length" => format!("{field} must not be empty"),
                    "range" => format!("{field} must be positive"),
                    _ => format!("{field} is invalid"),
                }
            })
            .collect();
        messages.sort();
        return Err(CoreError::Validation(messages.join("; ")));
    }

    let cover_letter = input
        .cover_letter
        .clone()
        .ok_or_else(|| CoreError::Validation("cover_letter is required".to_string()))?;

    Ok(NewApplication {
        cover_letter,
        proposed_rate: input.proposed_rate,
        portfolio_links: input.portfolio_links.clone().unwrap_or_default(),
        attachments: input.attachments.clone().unwrap_or_default(),
        estimated_delivery: input.estimated_delivery,
        notes: input.notes.clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
