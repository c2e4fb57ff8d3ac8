//! Campaign entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use reachly_core::filter::CampaignFacets;
use reachly_core::money::BudgetInput;
use reachly_core::types::{DbId, Timestamp};

/// A campaign row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub brand_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: f64,
    pub deadline: Option<Timestamp>,
    pub status: String,
    pub applications_count: i64,
    pub selected_influencers: Vec<DbId>,
    pub views: i64,
    pub location: Option<String>,
    pub is_remote: bool,
    pub content_types: Vec<String>,
    pub min_followers: i64,
    pub urgency: String,
    pub activated_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CampaignFacets for Campaign {
    fn id(&self) -> DbId {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn budget(&self) -> f64 {
        self.budget
    }
    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
    fn is_remote(&self) -> bool {
        self.is_remote
    }
    fn content_types(&self) -> &[String] {
        &self.content_types
    }
    fn min_followers(&self) -> i64 {
        self.min_followers
    }
    fn urgency(&self) -> &str {
        &self.urgency
    }
}

/// DTO for creating a new campaign.
///
/// Required fields are `Option` so that validation can report every missing
/// field in one pass instead of failing on the first at deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaign {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub category: Option<String>,
    /// Accepts a bare number or a currency-formatted string (`"$1,200"`).
    #[validate(required)]
    pub budget: Option<BudgetInput>,
    pub deadline: Option<Timestamp>,
    /// Defaults to `draft`; only `draft` or `active` are accepted.
    pub status: Option<String>,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub content_types: Option<Vec<String>>,
    pub min_followers: Option<i64>,
    pub urgency: Option<String>,
}

/// DTO for updating an existing campaign. All fields are optional.
///
/// Status is deliberately absent: status changes go through the dedicated
/// status operation so lifecycle timestamps are stamped consistently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCampaign {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub budget: Option<BudgetInput>,
    pub deadline: Option<Timestamp>,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub content_types: Option<Vec<String>>,
    pub min_followers: Option<i64>,
    pub urgency: Option<String>,
}

/// DTO for the status operation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCampaignStatus {
    pub status: String,
}

/// Fully resolved insert payload, produced by the lifecycle service after
/// validation and budget normalization.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: f64,
    pub deadline: Option<Timestamp>,
    pub status: String,
    pub location: Option<String>,
    pub is_remote: bool,
    pub content_types: Vec<String>,
    pub min_followers: i64,
    pub urgency: String,
}

/// Fully resolved partial-update payload (budget already normalized).
#[derive(Debug, Clone, Default)]
pub struct CampaignChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<Timestamp>,
    pub location: Option<String>,
    pub is_remote: Option<bool>,
    pub content_types: Option<Vec<String>>,
    pub min_followers: Option<i64>,
    pub urgency: Option<String>,
}
