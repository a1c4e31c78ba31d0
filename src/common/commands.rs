/// Lệnh từ lõi chat gửi xuống tầng mạng.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    Send(String),
    Shutdown,
}
