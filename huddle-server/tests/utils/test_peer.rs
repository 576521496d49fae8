use std::time::Duration;

use anyhow::{Context, Result, bail, ensure};
use tokio::time::timeout;

use huddle_core::{ChatPayload, ConnectionEntry, ConnectionId, Identity, ServerEvent};
use huddle_server::{HubHandle, PeerReceiver, peer_channel};

use super::event_helpers::{EVENT_TIMEOUT_MS, presence};

/// A peer wired straight to the hub, without a socket in between.
pub struct TestPeer {
    pub connection_id: ConnectionId,
    hub: HubHandle,
    rx: PeerReceiver,
}

impl TestPeer {
    /// Connects and consumes the welcome frame.
    pub async fn connect(hub: &HubHandle) -> Result<Self> {
        let connection_id = ConnectionId::new();
        let (tx, rx) = peer_channel();
        hub.connect(connection_id, tx)
            .await
            .context("Failed to connect")?;

        let mut peer = Self {
            connection_id,
            hub: hub.clone(),
            rx,
        };

        match peer.next_event().await? {
            ServerEvent::Welcome { connection_id: id } if id == connection_id => Ok(peer),
            other => bail!("Expected welcome for {}, got {:?}", connection_id, other),
        }
    }

    pub async fn announce(&self, identity: Identity) -> Result<()> {
        self.hub
            .announce(self.connection_id, identity)
            .await
            .context("Failed to announce")
    }

    pub async fn chat(&self, payload: ChatPayload) -> Result<()> {
        self.hub
            .chat(self.connection_id, payload)
            .await
            .context("Failed to send chat")
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.hub
            .disconnect(self.connection_id)
            .await
            .context("Failed to disconnect")
    }

    pub async fn next_event(&mut self) -> Result<ServerEvent> {
        timeout(Duration::from_millis(EVENT_TIMEOUT_MS), self.rx.recv())
            .await
            .context("Timed out waiting for event")?
            .context("Outbound queue closed")
    }

    pub async fn expect_presence(&mut self) -> Result<Vec<ConnectionEntry>> {
        presence(self.next_event().await?)
    }

    /// Everything queued for this peer once the hub has caught up.
    pub async fn drain(&mut self) -> Result<Vec<ServerEvent>> {
        self.hub.snapshot().await.context("Hub is gone")?;
        Ok(std::iter::from_fn(|| self.rx.try_recv().ok()).collect())
    }

    /// Drains and returns every presence snapshot received, oldest first.
    pub async fn presence_updates(&mut self) -> Result<Vec<Vec<ConnectionEntry>>> {
        Ok(self
            .drain()
            .await?
            .into_iter()
            .filter_map(|event| match event {
                ServerEvent::UsersOnline(entries) => Some(entries),
                _ => None,
            })
            .collect())
    }

    /// Drains and returns the most recent presence snapshot.
    pub async fn latest_presence(&mut self) -> Result<Vec<ConnectionEntry>> {
        self.presence_updates()
            .await?
            .pop()
            .context("No presence snapshot received")
    }

    /// Drains and expects exactly one presence snapshot.
    pub async fn single_presence(&mut self) -> Result<Vec<ConnectionEntry>> {
        let mut updates = self.presence_updates().await?;
        ensure!(
            updates.len() == 1,
            "Expected one presence update for {}, got {}",
            self.connection_id,
            updates.len()
        );
        updates.pop().context("No presence snapshot received")
    }

    pub async fn assert_silent(&mut self) -> Result<()> {
        let events = self.drain().await?;
        ensure!(
            events.is_empty(),
            "Expected no events for {}, got {:?}",
            self.connection_id,
            events
        );
        Ok(())
    }
}
