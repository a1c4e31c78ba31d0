use std::error::Error;
use std::time::Duration;

use libp2p::dcutr;
use libp2p::gossipsub::{self, IdentTopic};
use libp2p::identify;
use libp2p::ping;
use libp2p::relay::client;
use libp2p::swarm::NetworkBehaviour;
use libp2p::{PeerId, identity};

const PROTOCOL_VERSION: &str = "realtime-chat/1.0.0";

#[derive(NetworkBehaviour)]
pub struct ChatBehavior {
    pub gossipsub: gossipsub::Behaviour,
    pub identify: identify::Behaviour,
    pub relay: client::Behaviour,
    pub dcutr: dcutr::Behaviour,
    pub ping: ping::Behaviour,
}

/// Builds the swarm behaviour and subscribes to the chat topic.
///
/// Gossipsub keeps its default source + sequence number message id, so two
/// identical payloads are still delivered as two messages.
pub fn build_behavior(
    local_key: &identity::Keypair,
    local_peer_id: PeerId,
    relay_behaviour: client::Behaviour,
    topic_name: &str,
) -> Result<(ChatBehavior, IdentTopic), Box<dyn Error>> {
    let gossipsub_config = gossipsub::ConfigBuilder::default()
        .heartbeat_interval(Duration::from_secs(5))
        .validation_mode(gossipsub::ValidationMode::Strict)
        .build()?;

    let mut gossipsub = gossipsub::Behaviour::new(
        gossipsub::MessageAuthenticity::Signed(local_key.clone()),
        gossipsub_config,
    )?;

    let topic = gossipsub::IdentTopic::new(topic_name);
    gossipsub.subscribe(&topic)?;

    let identify_config =
        identify::Config::new(PROTOCOL_VERSION.into(), local_key.public().clone());
    let identify = identify::Behaviour::new(identify_config);

    let dcutr = dcutr::Behaviour::new(local_peer_id);
    let ping = ping::Behaviour::new(ping::Config::default());

    Ok((
        ChatBehavior {
            gossipsub,
            identify,
            relay: relay_behaviour,
            dcutr,
            ping,
        },
        topic,
    ))
}
