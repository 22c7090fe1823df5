//! WebSocket relay: fans accepted frames out to every other connected peer.
//!
//! Frames are forwarded exactly as received once their event name checks out.
//! Delivery is at-most-once with no replay; a slow peer skips what it missed.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::RELAY_CHANNEL_CAPACITY;

pub type PeerId = Uuid;

/// Event names accepted by the relay. Anything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelayEvent {
    ContentChange,
    NewComment,
    PresenceUpdate,
}

/// Wire frame: `{"event": "<name>", "data": <any JSON>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayFrame {
    pub event: RelayEvent,
    #[serde(default)]
    pub data: Value,
}

impl RelayFrame {
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[derive(Debug, Clone)]
struct Envelope {
    sender: PeerId,
    payload: Arc<str>,
}

/// Broadcast hub shared by every connection of the relay process.
#[derive(Clone)]
pub struct Relay {
    tx: broadcast::Sender<Envelope>,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(RELAY_CHANNEL_CAPACITY)
    }
}

impl Relay {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self, peer: PeerId) -> Subscription {
        Subscription {
            peer,
            rx: self.tx.subscribe(),
        }
    }

    pub fn peer_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Fan a raw text frame out, unchanged, to every other peer. Returns
    /// false when the frame was dropped as malformed or carried an unknown
    /// event.
    pub fn publish(&self, sender: PeerId, text: &str) -> bool {
        let Some(frame) = RelayFrame::parse(text) else {
            tracing::debug!(%sender, "dropping unrecognised relay frame");
            return false;
        };
        tracing::trace!(%sender, event = ?frame.event, "relaying frame");

        // No subscribers is not an error for a fire-and-forget relay.
        let _ = self.tx.send(Envelope {
            sender,
            payload: Arc::from(text),
        });
        true
    }
}

/// One peer's view of the channel, with its own frames filtered out.
pub struct Subscription {
    peer: PeerId,
    rx: broadcast::Receiver<Envelope>,
}

impl Subscription {
    pub fn peer(&self) -> PeerId {
        self.peer
    }

    /// Next frame from another peer, or `None` once the relay is gone.
    /// A lagging receiver skips what it missed.
    pub async fn next(&mut self) -> Option<Arc<str>> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if envelope.sender == self.peer => continue,
                Ok(envelope) => return Some(envelope.payload),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(peer = %self.peer, skipped, "relay peer lagged, frames skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

pub fn relay_router(relay: Relay) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

async fn ws_handler(ws: WebSocketUpgrade, State(relay): State<Relay>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: Relay) {
    let peer = Uuid::new_v4();
    let mut subscription = relay.subscribe(peer);
    let (mut sink, mut stream) = socket.split();

    tracing::info!(%peer, peers = relay.peer_count(), "relay peer connected");

    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = subscription.next().await {
            if sink.send(Message::Text(payload.to_string())).await.is_err() {
                break;
            }
        }
    });

    let inbound = relay.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => {
                    inbound.publish(peer, &text);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(%peer, "relay peer disconnected");
}
