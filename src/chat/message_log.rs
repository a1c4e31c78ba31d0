use std::sync::Arc;

use chrono::Local;

use crate::common::{ChatMessage, Sender};

/// Immutable view of the log at one point in time.
pub type Snapshot = Arc<Vec<ChatMessage>>;

/// Append-only, ordered record of the conversation.
///
/// Local sends and remote receipts go through the same [`MessageLog::append`]
/// so ids stay gapless regardless of origin. Entries live in a shared vector
/// that is cloned on write only while a snapshot is still held, which keeps
/// every handed-out [`Snapshot`] stable.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Snapshot,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank or whitespace-only text is dropped and `None` returned.
    pub fn append_local(&mut self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            log::debug!("Dropping blank local message");
            return None;
        }
        Some(self.append(Sender::Local, text.to_string()))
    }

    /// Remote payloads are accepted verbatim, empty ones included.
    pub fn append_remote(&mut self, payload: String) -> ChatMessage {
        self.append(Sender::Remote, payload)
    }

    fn append(&mut self, sender: Sender, content: String) -> ChatMessage {
        let entries = Arc::make_mut(&mut self.entries);
        let message = ChatMessage {
            id: entries.len() as u64 + 1,
            sender,
            content,
            timestamp: Local::now(),
        };
        entries.push(message.clone());
        message
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
