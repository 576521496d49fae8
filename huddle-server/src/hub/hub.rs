use crate::hub::hub_command::HubCommand;
use crate::hub::hub_handle::HubHandle;
use crate::presence::publish_snapshot;
use crate::registry::ConnectionRegistry;
use crate::relay::{relay_chat, relay_signal};
use crate::transport::{PeerSender, PeerSet};
use huddle_core::{ConnectionId, IceServerConfig, Identity, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const COMMAND_BUFFER: usize = 256;

/// Owner of the connection registry.
///
/// Every registry mutation and the presence publish that follows it happen
/// inside one command, so no snapshot ever shows a half-applied change.
/// Fan-out only enqueues into per-peer queues; socket writes happen in each
/// connection's own task.
pub struct Hub {
    registry: ConnectionRegistry,
    peers: PeerSet,
    ice_servers: Vec<IceServerConfig>,
    command_rx: mpsc::Receiver<HubCommand>,
}

impl Hub {
    pub fn new(
        command_rx: mpsc::Receiver<HubCommand>,
        peers: PeerSet,
        ice_servers: Vec<IceServerConfig>,
    ) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            peers,
            ice_servers,
            command_rx,
        }
    }

    /// Starts a hub task and returns the handle used to talk to it.
    pub fn spawn(peers: PeerSet, ice_servers: Vec<IceServerConfig>) -> HubHandle {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let hub = Self::new(rx, peers, ice_servers);
        tokio::spawn(hub.run());
        HubHandle::new(tx)
    }

    pub async fn run(mut self) {
        info!("Hub event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Command channel closed. Hub event loop finished");
    }

    fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Connect {
                connection_id,
                sender,
            } => self.connect(connection_id, sender),

            HubCommand::Announce {
                connection_id,
                identity,
            } => self.announce(connection_id, &identity),

            HubCommand::Chat {
                connection_id,
                payload,
            } => {
                relay_chat(&self.registry, &self.peers, &connection_id, payload);
            }

            HubCommand::Signal {
                connection_id,
                kind,
                payload,
            } => {
                relay_signal(&self.peers, &connection_id, kind, payload);
            }

            HubCommand::Disconnect { connection_id } => self.disconnect(&connection_id),

            HubCommand::Snapshot { reply } => {
                let _ = reply.send(self.registry.snapshot());
            }
        }
    }

    fn connect(&mut self, connection_id: ConnectionId, sender: PeerSender) {
        if self.peers.insert(connection_id, sender) {
            warn!("Replaced outbound queue of {}", connection_id);
        }

        self.peers
            .send(&connection_id, ServerEvent::Welcome { connection_id });
        if !self.ice_servers.is_empty() {
            let ice_servers = self.ice_servers.clone();
            self.peers
                .send(&connection_id, ServerEvent::IceConfig { ice_servers });
        }

        if let Err(e) = self.registry.insert(connection_id) {
            // Keep the existing entry and carry on serving everyone else.
            error!("Registry invariant broken: {}", e);
            return;
        }

        info!(
            "Peer {} connected, {} online",
            connection_id,
            self.registry.len()
        );
        publish_snapshot(&self.registry, &self.peers);
    }

    fn announce(&mut self, connection_id: ConnectionId, identity: &Identity) {
        // An announcement can race the disconnect of its own connection.
        if !self.peers.contains(&connection_id) {
            debug!("Ignoring announcement from departed peer {}", connection_id);
            return;
        }

        let outcome = self.registry.announce(connection_id, identity);
        if !outcome.changed() {
            return;
        }

        info!("Peer {} announced identity: {:?}", connection_id, outcome);
        publish_snapshot(&self.registry, &self.peers);
    }

    fn disconnect(&mut self, connection_id: &ConnectionId) {
        self.peers.remove(connection_id);

        if self.registry.remove(connection_id).is_none() {
            return;
        }

        info!(
            "Peer {} disconnected, {} online",
            connection_id,
            self.registry.len()
        );
        publish_snapshot(&self.registry, &self.peers);
    }
}
