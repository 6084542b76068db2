use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use utoipa::IntoParams;
use uuid::Uuid;

use super::EventHub;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JoinParams {
    /// Tasting to follow
    pub t: Uuid,
}

#[utoipa::path(
    get,
    path = "/ws/join",
    params(JoinParams),
    responses(
        (status = 101, description = "Switching to WebSocket; server pushes tasting events")
    ),
    tag = "realtime"
)]
pub async fn join_tasting(
    State(state): State<AppState>,
    Query(params): Query<JoinParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| forward_events(socket, hub, params.t))
}

/// Pushes the tasting's events down the socket until either side goes away.
/// Incoming frames other than close are ignored.
async fn forward_events(mut socket: WebSocket, hub: Arc<EventHub>, tasting_id: Uuid) {
    let mut rx = hub.subscribe(tasting_id);
    debug!(
        tasting_id = %tasting_id,
        listeners = hub.subscriber_count(tasting_id),
        "Socket connected"
    );

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(error = %e, "Failed to encode event");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(tasting_id = %tasting_id, skipped, "Socket lagging, events skipped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    drop(rx);
    hub.release(tasting_id);
    debug!(tasting_id = %tasting_id, "Socket disconnected");
}
