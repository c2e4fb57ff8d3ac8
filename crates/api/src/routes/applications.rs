//! Route definitions for applications.
//!
//! Mounted at `/applications` (and `/users` for the applicant-side views)
//! by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Application routes.
///
/// ```text
/// POST   /                  -> create_application
/// PUT    /batch             -> batch_update_applications
/// PUT    /bulk/status       -> bulk_update_status
/// GET    /{id}              -> get_application
/// PUT    /{id}              -> update_application (pending only)
/// PUT    /{id}/status       -> update_application_status
/// POST   /{id}/withdraw     -> withdraw_application
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(applications::create_application))
        .route("/batch", put(applications::batch_update_applications))
        .route("/bulk/status", put(applications::bulk_update_status))
        .route(
            "/{id}",
            get(applications::get_application).put(applications::update_application),
        )
        .route("/{id}/status", put(applications::update_application_status))
        .route("/{id}/withdraw", post(applications::withdraw_application))
}

/// Applicant-side routes mounted at `/users`.
///
/// ```text
/// GET /{user_id}/applications        -> user_applications
/// GET /{user_id}/applications/stats  -> user_application_stats
/// ```
pub fn user_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{user_id}/applications",
            get(applications::user_applications),
        )
        .route(
            "/{user_id}/applications/stats",
            get(applications::user_application_stats),
        )
}
