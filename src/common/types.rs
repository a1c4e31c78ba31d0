use std::fmt;

use chrono::{DateTime, Local};

/// Transport kind reported while no connection is active.
pub const UNKNOWN_TRANSPORT: &str = "N/A";

/// Which side of the conversation produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    Local,
    Remote,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::Local => "You",
            Sender::Remote => "Stranger",
        }
    }
}

/// Domain model đại diện một tin nhắn chat.
///
/// `id` is the 1-based position in the session log. It is a display key only
/// and never leaves this process.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn is_local(&self) -> bool {
        self.sender == Sender::Local
    }

    /// Admission time at hour:minute precision.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Trạng thái kết nối hiển thị trên thanh tiêu đề.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected { transport_kind: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected { .. })
    }

    pub fn transport_kind(&self) -> &str {
        match self {
            ConnectionStatus::Connected { transport_kind } => transport_kind,
            ConnectionStatus::Disconnected => UNKNOWN_TRANSPORT,
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected { transport_kind } => {
                write!(f, "Connected via {transport_kind}")
            }
            ConnectionStatus::Disconnected => f.write_str("Disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sender_labels() {
        assert_eq!(Sender::Local.label(), "You");
        assert_eq!(Sender::Remote.label(), "Stranger");
    }

    #[test]
    fn display_time_is_hour_minute() {
        let message = ChatMessage {
            id: 1,
            sender: Sender::Remote,
            content: "hi".to_string(),
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 9, 7, 42).unwrap(),
        };
        assert_eq!(message.display_time(), "09:07");
        assert!(!message.is_local());
    }

    #[test]
    fn unknown_transport_when_disconnected() {
        let status = ConnectionStatus::default();
        assert!(!status.is_connected());
        assert_eq!(status.transport_kind(), UNKNOWN_TRANSPORT);
        assert_eq!(status.to_string(), "Disconnected");

        let status = ConnectionStatus::Connected {
            transport_kind: "tcp".to_string(),
        };
        assert_eq!(status.transport_kind(), "tcp");
        assert_eq!(status.to_string(), "Connected via tcp");
    }
}
