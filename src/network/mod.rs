//! Transport Session boundary.
//!
//! [`TransportSession`] is everything the chat core needs from a connection:
//! open it once, push payloads out, read lifecycle and message events from the
//! returned receiver. [`Libp2pSession`] is the production implementation.

pub mod behavior;
pub mod client;
pub mod link;
pub mod session;
pub mod transport;

use tokio::sync::mpsc;

use crate::common::TransportEvent;
use crate::error::ChatError;

pub use client::P2PClient;
pub use link::{LinkKind, LinkTracker};
pub use session::Libp2pSession;

pub trait TransportSession {
    /// Starts the connection. The returned receiver is the only inbound
    /// subscription; events on it are ordered and delivered once.
    fn open(&mut self) -> Result<mpsc::Receiver<TransportEvent>, ChatError>;

    /// Best effort. Failures surface later as [`TransportEvent::Disconnected`].
    fn send(&self, payload: &str);

    /// Stops the connection. Calling it again does nothing.
    fn close(&mut self);
}
