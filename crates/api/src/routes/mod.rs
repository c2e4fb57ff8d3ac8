//! Route definitions.
//!
//! Each submodule exposes a `router()` mounted by [`api_routes`]; the
//! health route lives at the root level.

pub mod applications;
pub mod campaigns;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All API routes, mounted under `/api/v1` by the router builder.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/campaigns", campaigns::router())
        .nest("/applications", applications::router())
        .nest("/users", applications::user_router())
}
