//! Live sync WebSocket
//!
//! Streams every [`SyncPayload`](crate::core::SyncPayload) the server
//! broadcasts to connected UIs, replacing the per-collection listeners the
//! mobile app holds against the document database. The subscription ends
//! when the client disconnects; dropping it unsubscribes.

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/ws", get(ws_handler))
}

/// GET /api/sync/ws - upgrade to the live change feed
async fn ws_handler(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: ServerState) {
    let mut subscription = state.subscribe_sync();
    tracing::debug!("Sync subscriber connected");

    loop {
        tokio::select! {
            payload = subscription.next() => {
                let Some(payload) = payload else { break };
                let Ok(text) = serde_json::to_string(&payload) else {
                    tracing::warn!("Failed to serialize sync payload");
                    continue;
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                // Clients only listen; any close or error ends the stream
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("Sync subscriber disconnected");
    subscription.cancel();
}
