//! Realtime channel. A client connects to `GET /ws` and sends a join frame
//! `{"type":"join","user_id":"<uuid>"}` as its first message; from then on
//! the server pushes fanout events for that user as JSON text frames. The
//! socket closes when the client disconnects or sends a close frame.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ClientFrame {
    Join { user_id: Uuid },
}

pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(mut socket: WebSocket, state: Arc<AppState>) {
    // The session is anonymous until the join frame names a user channel.
    let user_id = loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientFrame>(&text) {
                Ok(ClientFrame::Join { user_id }) => break user_id,
                Err(err) => {
                    tracing::debug!("ignoring malformed ws frame: {}", err);
                }
            },
            Some(Ok(Message::Close(_))) | None => return,
            Some(Ok(_)) => {}
            Some(Err(err)) => {
                tracing::debug!("ws receive error before join: {}", err);
                return;
            }
        }
    };

    let mut events = state.fanout.subscribe(user_id).await;
    tracing::debug!("ws session joined for user {}", user_id);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { return };
                let Ok(frame) = serde_json::to_string(&event) else { continue };
                if socket.send(Message::Text(frame)).await.is_err() {
                    return;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => return,
                }
            }
        }
    }
}
