//! Route definitions for campaigns.
//!
//! Mounted at `/campaigns` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;
use crate::ws;

/// Campaign routes.
///
/// ```text
/// POST   /                          -> create_campaign
/// GET    /                          -> list_campaigns (brand side)
/// GET    /public                    -> public_campaigns (influencer side)
/// POST   /browse                    -> browse_campaigns (multi-criteria)
/// GET    /search                    -> search_campaigns
/// GET    /feed                      -> campaign_feed (WebSocket)
/// GET    /{id}                      -> get_campaign
/// PUT    /{id}                      -> update_campaign
/// DELETE /{id}                      -> delete_campaign
/// PUT    /{id}/status               -> update_campaign_status
/// POST   /{id}/views                -> record_view
/// POST   /{id}/duplicate            -> duplicate_campaign
/// GET    /{id}/applications         -> campaign_applications
/// GET    /{id}/applications/stats   -> campaign_application_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(campaigns::create_campaign).get(campaigns::list_campaigns),
        )
        .route("/public", get(campaigns::public_campaigns))
        .route("/browse", post(campaigns::browse_campaigns))
        .route("/search", get(campaigns::search_campaigns))
        .route("/feed", get(ws::campaign_feed))
        .route(
            "/{id}",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route("/{id}/status", put(campaigns::update_campaign_status))
        .route("/{id}/views", post(campaigns::record_view))
        .route("/{id}/duplicate", post(campaigns::duplicate_campaign))
        .route("/{id}/applications", get(campaigns::campaign_applications))
        .route(
            "/{id}/applications/stats",
            get(campaigns::campaign_application_stats),
        )
}
