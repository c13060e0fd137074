//! WebSocket push channel for dashboards.
//!
//! Frames are server-originated only: `{"event": "<topic>", "data": ...}`.
//! Client text frames are ignored.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use walkin_core::{Delivery, Subscription};

use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    match state.events().subscribe() {
        Some(subscription) => ws.on_upgrade(move |socket| handle_socket(socket, subscription)),
        None => (StatusCode::SERVICE_UNAVAILABLE, "shutting down").into_response(),
    }
}

/// Text frame for a delivery; `None` means the stream has ended.
pub(crate) fn frame_for(delivery: &Delivery) -> Option<String> {
    match delivery {
        Delivery::Event(event) => serde_json::to_string(event).ok(),
        Delivery::Lagged(missed) => {
            Some(serde_json::json!({"event": "resync", "data": {"missed": missed}}).to_string())
        },
        Delivery::Closed => None,
    }
}

async fn handle_socket(mut socket: WebSocket, mut subscription: Subscription) {
    debug!("realtime subscriber connected");

    loop {
        tokio::select! {
            delivery = subscription.next() => {
                if let Delivery::Lagged(missed) = delivery {
                    warn!(missed, "realtime subscriber lagged");
                }
                let Some(frame) = frame_for(&delivery) else {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                };
                if socket.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }

            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    debug!("realtime subscriber disconnected");
}
