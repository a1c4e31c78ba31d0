//! Realtime synchronization core for a two-party chat.
//!
//! - [`chat`] holds the session state: connection status, the append-only
//!   message log and the [`ChatCore`] that ties them to a transport.
//! - [`network`] is the transport boundary and its libp2p implementation.
//! - [`config`] loads the JSON config with env / CLI overrides.

pub mod chat;
pub mod common;
pub mod config;
pub mod error;
pub mod network;

pub use chat::{ChatCore, Snapshot};
pub use common::{ChatMessage, ConnectionStatus, Sender, TransportCommand, TransportEvent};
pub use error::{ChatError, ConfigError};
pub use network::{Libp2pSession, TransportSession};
