//! WebSocket endpoint streaming live campaign result sets.
//!
//! Each connection owns one [`CampaignFeed`] subscription scoped to the
//! public (active) campaign set; every delivery is forwarded to the client
//! as a JSON array. The subscription is disposed when the client goes away.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use reachly_core::query::CampaignQuery;
use reachly_db::models::campaign::Campaign;
use reachly_events::CampaignFeed;

use crate::state::AppState;

/// `GET /campaigns/feed` — upgrade to a live campaign feed.
pub async fn campaign_feed(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_feed(socket, state, query))
}

async fn run_feed(socket: WebSocket, state: AppState, query: CampaignQuery) {
    let descriptor = query.public_descriptor();

    let (tx, mut deliveries) = mpsc::unbounded_channel::<Vec<Campaign>>();
    let subscription = CampaignFeed::subscribe(
        state.pool.clone(),
        &state.event_bus,
        descriptor,
        Box::new(move |campaigns| {
            // The receiver half closing just means the socket is gone.
            let _ = tx.send(campaigns);
        }),
    );

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            delivery = deliveries.recv() => match delivery {
                Some(campaigns) => {
                    let text = match serde_json::to_string(&campaigns) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize feed delivery");
                            break;
                        }
                    };
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    subscription.unsubscribe();
    tracing::debug!("Campaign feed connection closed");
}
