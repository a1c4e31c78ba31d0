use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use libp2p::core::ConnectedPoint;

use crate::common::TransportEvent;

/// How a connection to the peer is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Direct,
    Relayed,
}

impl LinkKind {
    /// A listener on a relayed link only sees `/p2p/<peer>` as the remote
    /// address, so the circuit is detected on the local side instead.
    pub fn from_endpoint(endpoint: &ConnectedPoint) -> Self {
        if endpoint.is_relayed() {
            LinkKind::Relayed
        } else {
            LinkKind::Direct
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LinkKind::Direct => "tcp",
            LinkKind::Relayed => "relay",
        }
    }
}

#[derive(Debug)]
struct Link<P> {
    peer: P,
    kind: LinkKind,
}

/// Folds raw connection churn into connect / upgrade / disconnect.
///
/// A link only counts once its peer has joined the chat topic, since
/// nothing can be published to it before that. The reported kind is the best
/// counted link: direct beats relayed. Only a change of that kind is reported
/// while at least one counted link stays open.
#[derive(Debug)]
pub struct LinkTracker<P, K> {
    links: HashMap<K, Link<P>>,
    ready: HashSet<P>,
}

impl<P: Eq + Hash, K: Eq + Hash> Default for LinkTracker<P, K> {
    fn default() -> Self {
        Self {
            links: HashMap::new(),
            ready: HashSet::new(),
        }
    }
}

impl<P: Eq + Hash, K: Eq + Hash> LinkTracker<P, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_up(&mut self, peer: P, id: K, kind: LinkKind) -> Option<TransportEvent> {
        let before = self.preferred();
        self.links.insert(id, Link { peer, kind });
        self.transition(before)
    }

    /// The last link to a peer going down also forgets its subscription;
    /// a fresh connection announces it again.
    pub fn link_down(&mut self, id: &K) -> Option<TransportEvent> {
        let before = self.preferred();
        let link = self.links.remove(id)?;
        if !self.links.values().any(|other| other.peer == link.peer) {
            self.ready.remove(&link.peer);
        }
        self.transition(before)
    }

    /// The peer subscribed to the chat topic.
    pub fn peer_joined(&mut self, peer: P) -> Option<TransportEvent> {
        let before = self.preferred();
        self.ready.insert(peer);
        self.transition(before)
    }

    /// The peer unsubscribed from the chat topic.
    pub fn peer_left(&mut self, peer: &P) -> Option<TransportEvent> {
        let before = self.preferred();
        self.ready.remove(peer);
        self.transition(before)
    }

    pub fn is_linked(&self) -> bool {
        self.preferred().is_some()
    }

    fn preferred(&self) -> Option<LinkKind> {
        self.links
            .values()
            .filter(|link| self.ready.contains(&link.peer))
            .map(|link| link.kind)
            .min_by_key(|kind| match kind {
                LinkKind::Direct => 0,
                LinkKind::Relayed => 1,
            })
    }

    fn transition(&self, before: Option<LinkKind>) -> Option<TransportEvent> {
        match (before, self.preferred()) {
            (None, Some(kind)) => Some(TransportEvent::Connected {
                transport_kind: kind.label().to_string(),
            }),
            (Some(_), None) => Some(TransportEvent::Disconnected),
            (Some(old), Some(new)) if old != new => Some(TransportEvent::TransportUpgraded {
                transport_kind: new.label().to_string(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libp2p::Multiaddr;
    use libp2p::core::Endpoint;
    use libp2p::core::transport::PortUse;

    const PEER: &str = "peer";

    fn connected(kind: &str) -> Option<TransportEvent> {
        Some(TransportEvent::Connected {
            transport_kind: kind.to_string(),
        })
    }

    fn upgraded(kind: &str) -> Option<TransportEvent> {
        Some(TransportEvent::TransportUpgraded {
            transport_kind: kind.to_string(),
        })
    }

    fn addr(text: &str) -> Multiaddr {
        text.parse().unwrap()
    }

    #[test]
    fn dialed_circuit_is_relayed() {
        let dialer = |address: Multiaddr| ConnectedPoint::Dialer {
            address,
            role_override: Endpoint::Dialer,
            port_use: PortUse::default(),
        };
        assert_eq!(
            LinkKind::from_endpoint(&dialer(addr("/ip4/10.0.0.2/tcp/4001"))),
            LinkKind::Direct
        );
        assert_eq!(
            LinkKind::from_endpoint(&dialer(addr("/ip4/10.0.0.1/tcp/4001/p2p-circuit"))),
            LinkKind::Relayed
        );
    }

    #[test]
    fn accepted_circuit_is_relayed() {
        let relayed = ConnectedPoint::Listener {
            local_addr: addr("/ip4/10.0.0.1/tcp/4001/p2p-circuit"),
            send_back_addr: addr("/ip4/10.0.0.3/tcp/4001"),
        };
        assert_eq!(LinkKind::from_endpoint(&relayed), LinkKind::Relayed);

        let direct = ConnectedPoint::Listener {
            local_addr: addr("/ip4/0.0.0.0/tcp/4001"),
            send_back_addr: addr("/ip4/10.0.0.3/tcp/52000"),
        };
        assert_eq!(LinkKind::from_endpoint(&direct), LinkKind::Direct);
    }

    #[test]
    fn link_counts_only_after_peer_joins_topic() {
        let mut links = LinkTracker::new();
        assert_eq!(links.link_up(PEER, 1usize, LinkKind::Direct), None);
        assert!(!links.is_linked());
        assert_eq!(links.peer_joined(PEER), connected("tcp"));
        assert!(links.is_linked());
    }

    #[test]
    fn join_before_link_connects_on_link_up() {
        let mut links = LinkTracker::new();
        assert_eq!(links.peer_joined(PEER), None);
        assert_eq!(links.link_up(PEER, 1usize, LinkKind::Relayed), connected("relay"));
    }

    #[test]
    fn relay_then_direct_is_an_upgrade() {
        let mut links = LinkTracker::new();
        links.link_up(PEER, 1usize, LinkKind::Relayed);
        assert_eq!(links.peer_joined(PEER), connected("relay"));
        assert_eq!(links.link_up(PEER, 2, LinkKind::Direct), upgraded("tcp"));
        assert_eq!(links.link_down(&1), None);
        assert_eq!(links.link_down(&2), Some(TransportEvent::Disconnected));
        assert!(!links.is_linked());
    }

    #[test]
    fn extra_link_of_same_kind_is_silent() {
        let mut links = LinkTracker::new();
        links.peer_joined(PEER);
        assert_eq!(links.link_up(PEER, 1usize, LinkKind::Direct), connected("tcp"));
        assert_eq!(links.link_up(PEER, 2, LinkKind::Direct), None);
        assert_eq!(links.link_up(PEER, 3, LinkKind::Relayed), None);
        assert_eq!(links.link_down(&1), None);
        assert_eq!(links.link_down(&2), upgraded("relay"));
        assert_eq!(links.link_down(&3), Some(TransportEvent::Disconnected));
    }

    #[test]
    fn reconnect_waits_for_a_new_subscription() {
        let mut links = LinkTracker::new();
        links.peer_joined(PEER);
        links.link_up(PEER, 1usize, LinkKind::Direct);
        assert_eq!(links.link_down(&1), Some(TransportEvent::Disconnected));

        assert_eq!(links.link_up(PEER, 2, LinkKind::Direct), None);
        assert_eq!(links.peer_joined(PEER), connected("tcp"));
    }

    #[test]
    fn leaving_the_topic_disconnects() {
        let mut links = LinkTracker::new();
        links.peer_joined(PEER);
        links.link_up(PEER, 1usize, LinkKind::Direct);
        assert_eq!(links.peer_left(&PEER), Some(TransportEvent::Disconnected));
        assert_eq!(links.peer_joined(PEER), connected("tcp"));
    }

    #[test]
    fn unknown_link_down_is_ignored() {
        let mut links: LinkTracker<&str, usize> = LinkTracker::new();
        assert_eq!(links.link_down(&7), None);
        links.peer_joined(PEER);
        links.link_up(PEER, 1, LinkKind::Direct);
        assert_eq!(links.link_down(&7), None);
        assert!(links.is_linked());
    }
}
