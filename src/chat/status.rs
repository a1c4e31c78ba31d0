use crate::common::ConnectionStatus;

/// Follows transport lifecycle events for the status header.
///
/// Each handler returns `true` when the visible status changed.
#[derive(Debug, Default)]
pub struct ConnectionStatusTracker {
    status: ConnectionStatus,
}

impl ConnectionStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn on_connect(&mut self, transport_kind: &str) -> bool {
        log::info!("Connected via {transport_kind}");
        self.set(ConnectionStatus::Connected {
            transport_kind: transport_kind.to_string(),
        })
    }

    pub fn on_disconnect(&mut self) -> bool {
        if self.status.is_connected() {
            log::info!("Disconnected");
        }
        self.set(ConnectionStatus::Disconnected)
    }

    /// Upgrades only apply to a live connection; a late one is dropped.
    pub fn on_transport_upgrade(&mut self, transport_kind: &str) -> bool {
        if !self.status.is_connected() {
            log::debug!("Ignoring transport upgrade to {transport_kind} while disconnected");
            return false;
        }
        log::info!(
            "Transport upgraded from {} to {transport_kind}",
            self.status.transport_kind()
        );
        self.set(ConnectionStatus::Connected {
            transport_kind: transport_kind.to_string(),
        })
    }

    fn set(&mut self, status: ConnectionStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::UNKNOWN_TRANSPORT;

    fn connected(kind: &str) -> ConnectionStatus {
        ConnectionStatus::Connected {
            transport_kind: kind.to_string(),
        }
    }

    #[test]
    fn starts_disconnected() {
        let tracker = ConnectionStatusTracker::new();
        assert_eq!(tracker.status(), &ConnectionStatus::Disconnected);
    }

    #[test]
    fn upgrade_after_connect_replaces_kind() {
        let mut tracker = ConnectionStatusTracker::new();
        tracker.on_disconnect();
        assert!(tracker.on_connect("websocket"));
        assert!(tracker.on_transport_upgrade("websocket2"));
        assert_eq!(tracker.status(), &connected("websocket2"));
    }

    #[test]
    fn upgrade_while_disconnected_is_dropped() {
        let mut tracker = ConnectionStatusTracker::new();
        assert!(!tracker.on_transport_upgrade("x"));
        assert_eq!(tracker.status(), &ConnectionStatus::Disconnected);
    }

    #[test]
    fn disconnect_clears_transport_kind() {
        let mut tracker = ConnectionStatusTracker::new();
        tracker.on_connect("polling");
        assert!(tracker.on_disconnect());
        assert_eq!(tracker.status().transport_kind(), UNKNOWN_TRANSPORT);
        assert!(!tracker.on_disconnect());
    }

    #[test]
    fn survives_repeated_cycles() {
        let mut tracker = ConnectionStatusTracker::new();
        for _ in 0..50 {
            tracker.on_connect("polling");
            tracker.on_transport_upgrade("websocket");
            tracker.on_disconnect();
        }
        tracker.on_connect("websocket");
        assert_eq!(tracker.status(), &connected("websocket"));
    }

    #[test]
    fn connect_from_connected_switches_kind() {
        let mut tracker = ConnectionStatusTracker::new();
        tracker.on_connect("polling");
        assert!(tracker.on_connect("websocket"));
        assert!(!tracker.on_connect("websocket"));
        assert_eq!(tracker.status(), &connected("websocket"));
    }
}
