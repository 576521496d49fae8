use crate::error::RelayError;
use crate::hub::hub_command::HubCommand;
use crate::transport::PeerSender;
use huddle_core::{ChatPayload, ConnectionEntry, ConnectionId, Identity, SignalKind};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

/// Cheap, cloneable front of a running [`Hub`](crate::Hub).
#[derive(Clone, Debug)]
pub struct HubHandle {
    cmd_tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    pub fn new(cmd_tx: mpsc::Sender<HubCommand>) -> Self {
        Self { cmd_tx }
    }

    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        sender: PeerSender,
    ) -> Result<(), RelayError> {
        self.send(HubCommand::Connect {
            connection_id,
            sender,
        })
        .await
    }

    pub async fn announce(
        &self,
        connection_id: ConnectionId,
        identity: Identity,
    ) -> Result<(), RelayError> {
        self.send(HubCommand::Announce {
            connection_id,
            identity,
        })
        .await
    }

    pub async fn chat(
        &self,
        connection_id: ConnectionId,
        payload: ChatPayload,
    ) -> Result<(), RelayError> {
        self.send(HubCommand::Chat {
            connection_id,
            payload,
        })
        .await
    }

    pub async fn signal(
        &self,
        connection_id: ConnectionId,
        kind: SignalKind,
        payload: Value,
    ) -> Result<(), RelayError> {
        self.send(HubCommand::Signal {
            connection_id,
            kind,
            payload,
        })
        .await
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), RelayError> {
        self.send(HubCommand::Disconnect { connection_id }).await
    }

    /// Current presence list. Also a barrier: every command sent before this
    /// one has been fully processed when it returns.
    pub async fn snapshot(&self) -> Result<Vec<ConnectionEntry>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| RelayError::HubClosed)
    }

    async fn send(&self, cmd: HubCommand) -> Result<(), RelayError> {
        self.cmd_tx.send(cmd).await?;
        Ok(())
    }
}
