use dashmap::DashMap;
use huddle_core::{ConnectionId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

/// Events a peer may have waiting before it is cut off as too slow.
pub const PEER_QUEUE_CAPACITY: usize = 256;

/// Outbound queue of one connection. Drained by that connection's writer task.
pub type PeerSender = mpsc::Sender<ServerEvent>;
pub type PeerReceiver = mpsc::Receiver<ServerEvent>;

pub fn peer_channel() -> (PeerSender, PeerReceiver) {
    mpsc::channel(PEER_QUEUE_CAPACITY)
}

/// Outbound queues of every connected peer.
///
/// Enqueueing never waits on socket I/O, so one slow peer cannot hold up
/// delivery to the others. A peer whose queue is full is removed; its writer
/// drains what is left and then ends the session. Cloning shares the same set.
#[derive(Clone, Default)]
pub struct PeerSet {
    peers: Arc<DashMap<ConnectionId, PeerSender>>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, connection_id: ConnectionId, sender: PeerSender) -> bool {
        self.peers.insert(connection_id, sender).is_some()
    }

    pub(crate) fn remove(&self, connection_id: &ConnectionId) -> bool {
        self.peers.remove(connection_id).is_some()
    }

    /// Queues an event for a single peer.
    pub fn send(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool {
        let Some(peer) = self.peers.get(connection_id) else {
            warn!(
                "Attempted to send {} to disconnected peer {}",
                event.name(),
                connection_id
            );
            return false;
        };

        let result = peer.try_send(event);
        drop(peer);

        match result {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.evict(connection_id, event.name());
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Outbound queue of {} is closed", connection_id);
                false
            }
        }
    }

    /// Queues an event for every peer. Returns how many accepted it.
    pub fn broadcast(&self, event: &ServerEvent) -> usize {
        self.fan_out(None, event)
    }

    /// Queues an event for every peer except `sender`.
    pub fn broadcast_except(&self, sender: &ConnectionId, event: &ServerEvent) -> usize {
        self.fan_out(Some(sender), event)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.peers.contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    fn fan_out(&self, except: Option<&ConnectionId>, event: &ServerEvent) -> usize {
        // Collect first so no shard lock is held while sending.
        let targets: Vec<(ConnectionId, PeerSender)> = self
            .peers
            .iter()
            .filter(|entry| Some(entry.key()) != except)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (connection_id, sender) in targets {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => self.evict(&connection_id, event.name()),
                Err(TrySendError::Closed(_)) => warn!(
                    "Dropping {} for {}: outbound queue closed",
                    event.name(),
                    connection_id
                ),
            }
        }
        delivered
    }

    fn evict(&self, connection_id: &ConnectionId, event: &str) {
        warn!(
            "Outbound queue of {} is full at {}, dropping {} and the peer",
            connection_id, PEER_QUEUE_CAPACITY, event
        );
        self.peers.remove(connection_id);
    }
}
