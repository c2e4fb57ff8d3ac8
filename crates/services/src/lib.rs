//! Reachly lifecycle services.
//!
//! The campaign and application lifecycle managers sit between the HTTP
//! surface and the repositories: they validate input, enforce ownership and
//! state rules, keep derived counters best-effort, and perform the
//! cross-entity side effects of acceptance.

pub mod application;
pub mod campaign;

pub use application::{ApplicationService, ApplicationStats};
pub use campaign::{CampaignService, CampaignView};
