//! Application entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use reachly_core::types::{DbId, Timestamp};

/// An application row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub campaign_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub cover_letter: String,
    pub proposed_rate: Option<f64>,
    pub portfolio_links: Vec<String>,
    pub attachments: Vec<String>,
    pub estimated_delivery: Option<Timestamp>,
    pub notes: Option<String>,
    pub status_updated_at: Option<Timestamp>,
    pub accepted_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a new application.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApplication {
    #[validate(required, length(min = 1))]
    pub cover_letter: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub proposed_rate: Option<f64>,
    pub portfolio_links: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
    pub estimated_delivery: Option<Timestamp>,
    pub notes: Option<String>,
}

/// DTO for editing a pending application.
///
/// This struct is the allow-list: any other submitted field is dropped at
/// deserialization and never reaches the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApplication {
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<f64>,
    pub portfolio_links: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
    pub estimated_delivery: Option<Timestamp>,
    pub notes: Option<String>,
}

/// DTO for the status operation.
///
/// When `brand_id` is present the service verifies that brand owns the
/// campaign the application references before allowing the change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApplicationStatus {
    pub status: String,
    pub notes: Option<String>,
    pub brand_id: Option<DbId>,
}

/// DTO for bulk status updates across several applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateApplicationStatus {
    pub ids: Vec<DbId>,
    pub status: String,
    pub notes: Option<String>,
    pub brand_id: DbId,
}

/// One entry of a batched field edit.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchApplicationEdit {
    pub id: DbId,
    #[serde(flatten)]
    pub changes: UpdateApplication,
}

/// DTO for batched field edits across several applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchUpdateApplications {
    pub brand_id: DbId,
    pub updates: Vec<BatchApplicationEdit>,
}

/// Fully resolved insert payload, produced by the lifecycle service after
/// validation.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub cover_letter: String,
    pub proposed_rate: Option<f64>,
    pub portfolio_links: Vec<String>,
    pub attachments: Vec<String>,
    pub estimated_delivery: Option<Timestamp>,
    pub notes: Option<String>,
}
