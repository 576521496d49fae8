use crate::registry::ConnectionRegistry;
use crate::transport::PeerSet;
use huddle_core::ServerEvent;
use tracing::debug;

/// Sends the full list of online users to every connected peer, including
/// the one whose action caused the change. No diffing.
pub fn publish_snapshot(registry: &ConnectionRegistry, peers: &PeerSet) -> usize {
    let snapshot = registry.snapshot();
    let online = snapshot.len();

    let delivered = peers.broadcast(&ServerEvent::UsersOnline(snapshot));
    debug!("Published presence of {} users to {} peers", online, delivered);

    delivered
}
