pub mod message_log;
pub mod session;
pub mod status;

pub use message_log::{MessageLog, Snapshot};
pub use session::ChatCore;
pub use status::ConnectionStatusTracker;
