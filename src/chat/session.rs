use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::common::{ChatMessage, ConnectionStatus, TransportEvent};
use crate::error::ChatError;
use crate::network::TransportSession;

use super::message_log::{MessageLog, Snapshot};
use super::status::ConnectionStatusTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Open,
    Closed,
}

/// Composition root of one chat session.
///
/// Owns the transport, the status tracker and the message log. Inbound
/// events arrive through the single receiver handed out by
/// [`TransportSession::open`]; shells drive it with [`ChatCore::poll_events`]
/// or [`ChatCore::next_event`] and re-read [`ChatCore::status`] and
/// [`ChatCore::snapshot`] whenever [`ChatCore::revision`] moves.
pub struct ChatCore<T: TransportSession> {
    transport: T,
    tracker: ConnectionStatusTracker,
    log: MessageLog,
    state: SessionState,
    events: Option<mpsc::Receiver<TransportEvent>>,
    revision: u64,
}

impl<T: TransportSession> ChatCore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            tracker: ConnectionStatusTracker::new(),
            log: MessageLog::new(),
            state: SessionState::Idle,
            events: None,
            revision: 0,
        }
    }

    /// Opens the transport and subscribes to its events. Calling it again
    /// while open does nothing.
    pub fn open(&mut self) -> Result<(), ChatError> {
        match self.state {
            SessionState::Open => {
                log::debug!("Chat session already open");
                Ok(())
            }
            SessionState::Closed => Err(ChatError::SessionClosed),
            SessionState::Idle => {
                let events = self.transport.open()?;
                self.events = Some(events);
                self.state = SessionState::Open;
                log::info!("Chat session opened");
                Ok(())
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Appends `text` to the log and hands it to the transport unchanged.
    ///
    /// Returns `Ok(None)` for blank input, which is neither logged nor sent.
    pub fn send_text(&mut self, text: &str) -> Result<Option<ChatMessage>, ChatError> {
        self.ensure_open()?;
        let Some(message) = self.log.append_local(text) else {
            return Ok(None);
        };
        self.transport.send(text);
        self.touch();
        Ok(Some(message))
    }

    /// Sends the pending input buffer and clears it once accepted.
    pub fn submit(&mut self, input: &mut String) -> Result<Option<ChatMessage>, ChatError> {
        let sent = self.send_text(input)?;
        if sent.is_some() {
            input.clear();
        }
        Ok(sent)
    }

    /// Records one payload received from the peer.
    pub fn on_inbound(&mut self, payload: String) -> ChatMessage {
        let message = self.log.append_remote(payload);
        self.touch();
        message
    }

    /// Applies every event already queued by the transport without waiting.
    /// Returns how many were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let next = match self.events.as_mut() {
                Some(events) => events.try_recv(),
                None => break,
            };
            match next {
                Ok(event) => {
                    self.apply(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.on_events_closed();
                    break;
                }
            }
        }
        applied
    }

    /// Waits for the next transport event and applies it. Returns `false`
    /// once the session has no more events to deliver.
    pub async fn next_event(&mut self) -> bool {
        let Some(events) = self.events.as_mut() else {
            return false;
        };
        match events.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => {
                self.on_events_closed();
                false
            }
        }
    }

    /// Tears the session down. Safe to call more than once.
    pub fn close(&mut self) {
        match self.state {
            SessionState::Closed => return,
            SessionState::Idle => {}
            SessionState::Open => {
                self.events = None;
                self.transport.close();
                if self.tracker.on_disconnect() {
                    self.touch();
                }
                log::info!("Chat session closed");
            }
        }
        self.state = SessionState::Closed;
    }

    pub fn status(&self) -> &ConnectionStatus {
        self.tracker.status()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.log.snapshot()
    }

    /// Bumped on every visible change to status or log.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn apply(&mut self, event: TransportEvent) {
        let changed = match event {
            TransportEvent::Connected { transport_kind } => {
                self.tracker.on_connect(&transport_kind)
            }
            TransportEvent::Disconnected => self.tracker.on_disconnect(),
            TransportEvent::TransportUpgraded { transport_kind } => {
                self.tracker.on_transport_upgrade(&transport_kind)
            }
            TransportEvent::Message(payload) => {
                self.on_inbound(payload);
                return;
            }
        };
        if changed {
            self.touch();
        }
    }

    fn on_events_closed(&mut self) {
        log::warn!("Transport event stream ended");
        self.events = None;
        if self.tracker.on_disconnect() {
            self.touch();
        }
    }

    fn ensure_open(&self) -> Result<(), ChatError> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Idle => Err(ChatError::SessionNotOpen),
            SessionState::Closed => Err(ChatError::SessionClosed),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl<T: TransportSession> Drop for ChatCore<T> {
    fn drop(&mut self) {
        self.close();
    }
}
