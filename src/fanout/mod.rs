//! Notification fanout: per-user channels feeding connected websocket
//! sessions. Delivery is fire-and-forget; a recipient with no live session
//! simply misses the event, and nothing is retried or replayed.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// A single realtime event, e.g. `case:updated` with the case payload.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub event: String,
    pub payload: Value,
}

#[derive(Clone, Default)]
pub struct Fanout {
    channels: Arc<RwLock<HashMap<Uuid, Vec<mpsc::UnboundedSender<Event>>>>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session on the given user's channel. The session receives
    /// every event published to that user until the receiver is dropped.
    pub async fn subscribe(&self, user_id: Uuid) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.write().await.entry(user_id).or_default().push(tx);
        rx
    }

    /// Deliver an event to every live session of every recipient. Sessions
    /// whose receiver has gone away are pruned; their absence is not an
    /// error, since the triggering mutation is already committed.
    pub async fn publish(&self, event: &str, payload: Value, recipients: &[Uuid]) {
        let mut channels = self.channels.write().await;
        for user_id in recipients {
            if let Some(senders) = channels.get_mut(user_id) {
                senders.retain(|tx| {
                    tx.send(Event {
                        event: event.to_string(),
                        payload: payload.clone(),
                    })
                    .is_ok()
                });
                if senders.is_empty() {
                    channels.remove(user_id);
                }
            }
        }
    }

    /// Number of live sessions across all channels. Used by tests.
    pub async fn session_count(&self) -> usize {
        self.channels.read().await.values().map(Vec::len).sum()
    }
}
