use std::collections::HashSet;
use std::error::Error;
use std::time::Duration;

use futures::StreamExt;
use libp2p::gossipsub;
use libp2p::identify;
use libp2p::multiaddr::Protocol;
use libp2p::relay::client;
use libp2p::swarm::{Config as SwarmConfig, ConnectionId, SwarmEvent};
use libp2p::{Multiaddr, PeerId, Swarm, identity};
use tokio::sync::mpsc;

use crate::common::{TransportCommand, TransportEvent};
use crate::config::AppConfig;

use super::behavior::{ChatBehavior, ChatBehaviorEvent, build_behavior};
use super::link::{LinkKind, LinkTracker};
use super::transport::build_transport;

const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Vòng lặp mạng: nhận lệnh từ lõi chat, đẩy sự kiện ngược lên.
pub struct P2PClient {
    config: AppConfig,
    event_sender: mpsc::Sender<TransportEvent>,
    command_receiver: mpsc::UnboundedReceiver<TransportCommand>,
    topic: gossipsub::TopicHash,
    relay_peers: HashSet<PeerId>,
    links: LinkTracker<PeerId, ConnectionId>,
}

impl P2PClient {
    pub fn new(
        config: AppConfig,
        event_sender: mpsc::Sender<TransportEvent>,
        command_receiver: mpsc::UnboundedReceiver<TransportCommand>,
    ) -> Self {
        let topic = gossipsub::IdentTopic::new(&config.topic).hash();
        Self {
            config,
            event_sender,
            command_receiver,
            topic,
            relay_peers: HashSet::new(),
            links: LinkTracker::new(),
        }
    }

    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        let local_key = identity::Keypair::generate_ed25519();
        let local_peer_id = PeerId::from(local_key.public());
        log::info!("Local PeerID: {local_peer_id:?}");

        let (transport, relay_behaviour) = build_transport(&local_key, local_peer_id)?;
        let (behavior, topic) =
            build_behavior(&local_key, local_peer_id, relay_behaviour, &self.config.topic)?;

        let mut swarm = Swarm::new(
            transport,
            behavior,
            local_peer_id,
            SwarmConfig::with_tokio_executor()
                .with_idle_connection_timeout(IDLE_CONNECTION_TIMEOUT),
        );

        swarm.listen_on(self.config.listen_addr.parse()?)?;
        self.dial_relays(&mut swarm);
        self.dial_peer(&mut swarm);

        log::info!("Network event loop started");

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(TransportCommand::Send(payload)) => {
                            publish(&mut swarm, &topic, payload);
                        }
                        Some(TransportCommand::Shutdown) | None => break,
                    }
                }
                event = swarm.select_next_some() => {
                    self.handle_swarm_event(event, &mut swarm).await;
                }
            }
        }

        log::info!("Network event loop stopped");
        Ok(())
    }

    fn dial_relays(&mut self, swarm: &mut Swarm<ChatBehavior>) {
        for entry in &self.config.relay_addrs {
            let Some((relay_id, addr)) = parse_peer_addr(entry) else {
                continue;
            };
            self.relay_peers.insert(relay_id);
            if let Err(err) = swarm.dial(addr.clone()) {
                log::warn!("Failed to dial relay {relay_id}: {err}");
                continue;
            }
            // Reserve a slot so the peer can reach us through the relay.
            let circuit = addr.with(Protocol::P2pCircuit);
            match swarm.listen_on(circuit.clone()) {
                Ok(_) => log::info!("Listening on relay circuit {circuit}"),
                Err(err) => log::warn!("Failed to listen on relay circuit {circuit}: {err}"),
            }
        }
    }

    fn dial_peer(&self, swarm: &mut Swarm<ChatBehavior>) {
        let Some(entry) = &self.config.peer_addr else {
            log::info!("No peer address configured; waiting for the peer to dial in");
            return;
        };
        match entry.parse::<Multiaddr>() {
            Ok(addr) => {
                log::info!("Dialing peer at {addr}");
                if let Err(err) = swarm.dial(addr) {
                    log::warn!("Failed to dial peer: {err}");
                }
            }
            Err(err) => log::warn!("Invalid peer multiaddr `{entry}`: {err}"),
        }
    }

    async fn handle_swarm_event(
        &mut self,
        event: SwarmEvent<ChatBehaviorEvent>,
        swarm: &mut Swarm<ChatBehavior>,
    ) {
        match event {
            SwarmEvent::Behaviour(ChatBehaviorEvent::Gossipsub(gossipsub::Event::Message {
                message,
                ..
            })) => match String::from_utf8(message.data) {
                Ok(payload) => self.emit(TransportEvent::Message(payload)).await,
                Err(err) => log::warn!("Dropping non UTF-8 payload: {err}"),
            },
            SwarmEvent::Behaviour(ChatBehaviorEvent::Gossipsub(gossipsub::Event::Subscribed {
                peer_id,
                topic,
            })) => {
                if topic != self.topic {
                    return;
                }
                log::debug!("Peer {peer_id} joined {topic}");
                if let Some(event) = self.links.peer_joined(peer_id) {
                    self.emit(event).await;
                }
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Gossipsub(
                gossipsub::Event::Unsubscribed { peer_id, topic },
            )) => {
                if topic != self.topic {
                    return;
                }
                log::debug!("Peer {peer_id} left {topic}");
                if let Some(event) = self.links.peer_left(&peer_id) {
                    self.emit(event).await;
                }
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Identify(identify::Event::Received {
                peer_id,
                info,
                ..
            })) => {
                log::debug!(
                    "Identify info from {peer_id}: protocols={:?}",
                    info.protocols
                );
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Relay(
                client::Event::ReservationReqAccepted { relay_peer_id, .. },
            )) => {
                log::info!("Relay reservation accepted by {relay_peer_id}");
            }
            SwarmEvent::Behaviour(ChatBehaviorEvent::Dcutr(event)) => {
                log::debug!("DCUtR event: {event:?}");
            }
            SwarmEvent::NewListenAddr { address, .. } => {
                log::info!("Listening on {address:?}");
            }
            SwarmEvent::ConnectionEstablished {
                peer_id,
                connection_id,
                endpoint,
                ..
            } => {
                if self.relay_peers.contains(&peer_id) {
                    log::debug!("Connected to relay {peer_id}");
                    return;
                }
                swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
                let kind = LinkKind::from_endpoint(&endpoint);
                log::debug!("Link {connection_id:?} to {peer_id} up ({})", kind.label());
                // Reported once the peer's topic subscription arrives.
                if let Some(event) = self.links.link_up(peer_id, connection_id, kind) {
                    self.emit(event).await;
                }
            }
            SwarmEvent::ConnectionClosed {
                peer_id,
                connection_id,
                num_established,
                cause,
                ..
            } => {
                if self.relay_peers.contains(&peer_id) {
                    log::warn!("Lost relay {peer_id}: {cause:?}");
                    return;
                }
                log::debug!("Link {connection_id:?} to {peer_id} closed: {cause:?}");
                if num_established == 0 {
                    swarm.behaviour_mut().gossipsub.remove_explicit_peer(&peer_id);
                }
                if let Some(event) = self.links.link_down(&connection_id) {
                    self.emit(event).await;
                }
            }
            SwarmEvent::OutgoingConnectionError { peer_id, error, .. } => {
                log::warn!("Outgoing connection to {peer_id:?} failed: {error}");
            }
            _ => {}
        }
    }

    async fn emit(&self, event: TransportEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to deliver transport event: {err}");
        }
    }
}

/// Fire-and-forget; a failed publish only shows up later as a disconnect.
fn publish(swarm: &mut Swarm<ChatBehavior>, topic: &gossipsub::IdentTopic, payload: String) {
    if let Err(err) = swarm
        .behaviour_mut()
        .gossipsub
        .publish(topic.clone(), payload.into_bytes())
    {
        log::warn!("Publish error: {err:?}");
    }
}

fn parse_peer_addr(entry: &str) -> Option<(PeerId, Multiaddr)> {
    let addr: Multiaddr = match entry.parse() {
        Ok(addr) => addr,
        Err(err) => {
            log::warn!("Invalid multiaddr `{entry}`: {err}");
            return None;
        }
    };

    match addr.iter().last() {
        Some(Protocol::P2p(peer_id)) => Some((peer_id, addr)),
        _ => {
            log::warn!("Multiaddr `{entry}` missing /p2p/PeerId suffix");
            None
        }
    }
}
