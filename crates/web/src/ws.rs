use std::sync::Arc;

use actors::actor_ref::ActorRef;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use broadcast::{Broadcaster, Frame};
use chrono::Utc;
use pipeline::{GetSnapshot, VehicleTracker};

use crate::state::WebState;

pub fn routes() -> Router<WebState> {
    Router::new().route("/vehicles", get(ws_vehicles))
}

async fn ws_vehicles(
    ws: WebSocketUpgrade,
    State(tracker): State<ActorRef<VehicleTracker>>,
    State(broadcaster): State<Arc<Broadcaster>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, tracker, broadcaster))
}

/// Sends the current snapshot once on connect, then streams every subsequent
/// tick's update until the client disconnects or the broadcast channel is
/// gone. A lagging client that falls behind the configured buffer depth
/// silently skips ahead rather than blocking the tick loop.
async fn handle_socket(socket: WebSocket, tracker: ActorRef<VehicleTracker>, broadcaster: Arc<Broadcaster>) {
    use futures::{SinkExt, StreamExt};

    let (mut sender, mut receiver) = socket.split();
    let mut frames = broadcaster.subscribe();

    let vehicles = tracker.ask(GetSnapshot).await.unwrap_or_default();
    let snapshot = broadcaster.snapshot(vehicles, Utc::now());
    if send_frame(&mut sender, &snapshot).await.is_err() {
        return;
    }

    let forward_task = tokio::spawn(async move {
        loop {
            match frames.recv().await {
                Ok(frame) => {
                    if send_frame(&mut sender, &frame).await.is_err() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "websocket subscriber lagged, dropping frames");
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    while let Some(message) = receiver.next().await {
        if matches!(message, Ok(Message::Close(_)) | Err(_)) {
            break;
        }
    }

    forward_task.abort();
}

async fn send_frame(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    frame: &Frame,
) -> Result<(), axum::Error> {
    use futures::SinkExt;
    let json = serde_json::to_string(frame).expect("frame serialization cannot fail");
    sender.send(Message::Text(json)).await
}
