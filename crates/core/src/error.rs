use crate::types::DbId;

/// Domain error taxonomy shared by every layer above the store.
///
/// Repositories classify transport failures into [`CoreError::Network`] so
/// callers can surface a "check your connection" message; lifecycle services
/// add the domain-specific variants on top. No layer retries automatically.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
