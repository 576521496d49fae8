use crate::transport::PeerSender;
use huddle_core::{ChatPayload, ConnectionEntry, ConnectionId, Identity, SignalKind};
use serde_json::Value;
use tokio::sync::oneshot;

/// Requests processed by the hub, one at a time and in arrival order.
#[derive(Debug)]
pub enum HubCommand {
    /// A socket was accepted; `sender` is its outbound queue.
    Connect {
        connection_id: ConnectionId,
        sender: PeerSender,
    },

    /// The peer told us who it is.
    Announce {
        connection_id: ConnectionId,
        identity: Identity,
    },

    Chat {
        connection_id: ConnectionId,
        payload: ChatPayload,
    },

    Signal {
        connection_id: ConnectionId,
        kind: SignalKind,
        payload: Value,
    },

    /// The socket closed or failed.
    Disconnect { connection_id: ConnectionId },

    /// Current presence list, answered once every earlier command is done.
    Snapshot {
        reply: oneshot::Sender<Vec<ConnectionEntry>>,
    },
}
