//! Classification of store errors into the domain taxonomy.
//!
//! Transport and availability failures become [`CoreError::Network`] so the
//! UI can suggest a retry; unique-constraint violations on `uq_`-prefixed
//! constraints become [`CoreError::Duplicate`]; everything else is logged
//! and surfaced as a generic internal failure. No retries happen here.

use reachly_core::error::CoreError;

/// User-facing message for transport/availability failures.
const NETWORK_MESSAGE: &str =
    "The marketplace could not be reached. Check your connection and try again.";

/// User-facing message for unexpected store failures.
const INTERNAL_MESSAGE: &str = "The operation failed. Please try again later.";

/// Classify a sqlx error into a [`CoreError`].
pub fn classify(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => {
            tracing::warn!(error = %err, "Store transport error");
            CoreError::Network(NETWORK_MESSAGE.to_string())
        }
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return CoreError::Duplicate(format!(
                        "Duplicate value violates unique constraint: {constraint}"
                    ));
                }
            }
            tracing::error!(error = %db_err, "Database error");
            CoreError::Internal(INTERNAL_MESSAGE.to_string())
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            CoreError::Internal(INTERNAL_MESSAGE.to_string())
        }
    }
}
