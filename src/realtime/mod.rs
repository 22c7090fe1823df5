//! Real-time relay: a WebSocket fan-out of UI events between connected peers.
//!
//! Runs as its own process (`relay` subcommand). Delivery is at-most-once,
//! nothing is stored and a peer never receives its own frames.

mod relay;

pub use relay::{relay_router, PeerId, Relay, RelayEvent, RelayFrame, Subscription};
