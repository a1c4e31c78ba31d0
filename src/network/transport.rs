use std::error::Error;

use libp2p::core::muxing::StreamMuxerBox;
use libp2p::core::transport::{Boxed, OrTransport};
use libp2p::core::upgrade::Version;
use libp2p::relay::client;
use libp2p::{PeerId, Transport, dns, identity, noise, tcp, yamux};

pub type ChatTransport = Boxed<(PeerId, StreamMuxerBox)>;

/// Direct links go over TCP (with `/dns` names resolved by the system
/// resolver); relay circuits are the fallback path to the peer. Both share
/// one noise + yamux upgrade so the link kind is only visible in the address.
pub fn build_transport(
    local_key: &identity::Keypair,
    local_peer_id: PeerId,
) -> Result<(ChatTransport, client::Behaviour), Box<dyn Error>> {
    let (relay_transport, relay_behaviour) = client::new(local_peer_id);

    let direct = dns::tokio::Transport::system(tcp::tokio::Transport::new(
        tcp::Config::default().nodelay(true),
    ))?;

    let transport = OrTransport::new(direct, relay_transport)
        .upgrade(Version::V1)
        .authenticate(noise::Config::new(local_key)?)
        .multiplex(yamux::Config::default())
        .boxed();

    Ok((transport, relay_behaviour))
}
