//! WebSocket endpoint for live traffic observation.
//!
//! Clients connect at `/ws/traffic` and receive every new-call event as a
//! JSON text frame. The protocol is one-way; the only client frames acted
//! on are pings and close.

use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::hub::TrafficHub;

/// Build the observer-facing router. Merged into the main API router by
/// the node.
pub fn router(hub: Arc<TrafficHub>) -> Router {
    Router::new()
        .route("/ws/traffic", get(ws_handler))
        .with_state(hub)
}

/// Upgrade an HTTP request to a WebSocket connection.
async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<Arc<TrafficHub>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Drive a single observer connection.
///
/// The flow:
/// 1. Register with the hub and get the connection's event queue.
/// 2. Spawn a forwarder task that drains the queue into the socket.
/// 3. Read client frames until close or error, answering pings.
/// 4. Deregister on the way out; the forwarder winds down once the hub
///    drops the queue's sending half.
async fn handle_socket(socket: WebSocket, hub: Arc<TrafficHub>) {
    let (id, mut events) = hub.connect().await;
    let (ws_sender, mut ws_receiver) = socket.split();

    // Shared between the forwarder task and the pong replies below.
    let ws_sender = Arc::new(tokio::sync::Mutex::new(ws_sender));

    let forward_sender = ws_sender.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(payload) = events.recv().await {
            let mut sender = forward_sender.lock().await;
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = ws_receiver.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(err) => {
                warn!(%id, error = %err, "websocket receive error");
                break;
            }
        };

        match msg {
            Message::Close(_) => {
                debug!(%id, "observer sent close frame");
                break;
            }
            Message::Ping(data) => {
                let mut sender = ws_sender.lock().await;
                let _ = sender.send(Message::Pong(data)).await;
            }
            _ => {}
        }
    }

    // Both the error path and the close path land here; disconnect is
    // idempotent so racing an eviction by the hub is fine.
    hub.disconnect(id).await;
    forwarder.abort();
    debug!(%id, "observer connection closed");
}
