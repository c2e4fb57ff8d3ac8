//! Reachly domain core.
//!
//! Pure domain logic with no internal dependencies: shared ID/timestamp
//! aliases, the error taxonomy, campaign and application status rules,
//! budget normalization, the filter-descriptor types used by one-shot
//! queries and live feeds alike, and the client-side multi-criteria
//! campaign filter evaluator.

pub mod application;
pub mod campaign;
pub mod error;
pub mod filter;
pub mod money;
pub mod query;
pub mod types;
