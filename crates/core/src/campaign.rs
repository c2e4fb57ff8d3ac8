//! Campaign status and urgency constants with validation.
//!
//! Status values are stored verbatim in the `campaigns.status` column and
//! used by the lifecycle service, the repository layer, and the public
//! browsing filters.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status for a newly created campaign.
pub const STATUS_DRAFT: &str = "draft";
/// Campaign is open and visible to browsing influencers.
pub const STATUS_ACTIVE: &str = "active";
/// All work on the campaign is done.
pub const STATUS_COMPLETED: &str = "completed";
/// Temporarily closed for new applications.
pub const STATUS_PAUSED: &str = "paused";
/// Abandoned by the brand.
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid campaign statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_ACTIVE,
    STATUS_COMPLETED,
    STATUS_PAUSED,
    STATUS_CANCELLED,
];

/// Statuses a campaign may be created with. Anything else starts as a draft
/// edit first.
pub const VALID_CREATE_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_ACTIVE];

// ---------------------------------------------------------------------------
// Urgency constants
// ---------------------------------------------------------------------------

pub const URGENCY_LOW: &str = "low";
pub const URGENCY_MEDIUM: &str = "medium";
pub const URGENCY_HIGH: &str = "high";

/// All valid urgency levels for a campaign.
pub const VALID_URGENCIES: &[&str] = &[URGENCY_LOW, URGENCY_MEDIUM, URGENCY_HIGH];

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that a status string is one of the known campaign statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid campaign status '{}'. Must be one of: {:?}",
            status, VALID_STATUSES
        )))
    }
}

/// Validate a status supplied at creation time.
pub fn validate_create_status(status: &str) -> Result<(), CoreError> {
    if VALID_CREATE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Campaigns can only be created as '{}' or '{}', got '{}'",
            STATUS_DRAFT, STATUS_ACTIVE, status
        )))
    }
}

/// Returns `true` if the given urgency level is valid.
pub fn is_valid_urgency(urgency: &str) -> bool {
    VALID_URGENCIES.contains(&urgency)
}

/// Validate an urgency level.
pub fn validate_urgency(urgency: &str) -> Result<(), CoreError> {
    if is_valid_urgency(urgency) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid urgency '{}'. Must be one of: {:?}",
            urgency, VALID_URGENCIES
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
