/// Sự kiện từ tầng mạng gửi lên lõi chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A (re)connection succeeded over the given transport kind.
    Connected { transport_kind: String },
    Disconnected,
    /// The link renegotiated its transport without dropping.
    TransportUpgraded { transport_kind: String },
    /// One inbound payload on the `message` channel, verbatim.
    Message(String),
}
