//! Application status constants and lifecycle rules.
//!
//! An application is created `pending` and moves to exactly one of the
//! terminal-ish states below. The applicant may only withdraw while the
//! application has not been accepted; after acceptance the owning brand is
//! the sole party that can transition it further.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status for a newly submitted application.
pub const STATUS_PENDING: &str = "pending";
/// The brand accepted the application; the influencer joins the campaign.
pub const STATUS_ACCEPTED: &str = "accepted";
/// The brand declined the application.
pub const STATUS_REJECTED: &str = "rejected";
/// The applicant withdrew before a decision.
pub const STATUS_WITHDRAWN: &str = "withdrawn";
/// The collaboration ran to completion.
pub const STATUS_COMPLETED: &str = "completed";

/// All valid application statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_ACCEPTED,
    STATUS_REJECTED,
    STATUS_WITHDRAWN,
    STATUS_COMPLETED,
];

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Validate that a status string is one of the known application statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid application status '{}'. Must be one of: {:?}",
            status, VALID_STATUSES
        )))
    }
}

/// Check whether the applicant may withdraw from the given current status.
///
/// An accepted application cannot be withdrawn by the applicant; the brand
/// has to be contacted instead. Every other status may transition to
/// `withdrawn`.
pub fn validate_withdrawal(current: &str) -> Result<(), CoreError> {
    if current == STATUS_ACCEPTED {
        return Err(CoreError::InvalidState(
            "An accepted application cannot be withdrawn. Contact the brand to cancel the \
             collaboration."
                .to_string(),
        ));
    }
    Ok(())
}

/// Check whether the applicant may still edit the application.
///
/// Edits are only permitted while the application is `pending`.
pub fn validate_editable(current: &str) -> Result<(), CoreError> {
    if current != STATUS_PENDING {
        return Err(CoreError::InvalidState(format!(
            "Applications can only be edited while pending, current status is '{current}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
