use crate::model::chat::{ChatPayload, OutgoingChatMessage};
use crate::model::connection::ConnectionId;
use crate::model::entry::ConnectionEntry;
use crate::model::signaling::{IceServerConfig, SignalKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames a peer sends to the relay: `{"event": .., "data": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Identity announcement. The payload is loosely typed, see
    /// [`Identity::from_value`](crate::Identity::from_value).
    #[serde(rename = "newUser", alias = "announce-identity")]
    NewUser(Value),

    #[serde(rename = "chat:message", alias = "chat-message")]
    ChatMessage(ChatPayload),

    #[serde(rename = "offer", alias = "signal-offer")]
    Offer(Value),

    #[serde(rename = "answer", alias = "signal-answer")]
    Answer(Value),

    #[serde(rename = "ice-candidate", alias = "signal-ice")]
    IceCandidate(Value),
}

/// Frames the relay sends to peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// First frame on every connection, tells the peer its own handle.
    #[serde(rename = "welcome")]
    Welcome {
        #[serde(rename = "connectionId")]
        connection_id: ConnectionId,
    },

    #[serde(rename = "iceConfig")]
    IceConfig {
        #[serde(rename = "iceServers")]
        ice_servers: Vec<IceServerConfig>,
    },

    /// Full presence snapshot.
    #[serde(rename = "usersOnline")]
    UsersOnline(Vec<ConnectionEntry>),

    #[serde(rename = "chat:message")]
    ChatMessage(OutgoingChatMessage),

    #[serde(rename = "offer")]
    Offer(Value),

    #[serde(rename = "answer")]
    Answer(Value),

    #[serde(rename = "ice-candidate")]
    IceCandidate(Value),
}

impl ServerEvent {
    pub fn signal(kind: SignalKind, payload: Value) -> Self {
        match kind {
            SignalKind::Offer => Self::Offer(payload),
            SignalKind::Answer => Self::Answer(payload),
            SignalKind::IceCandidate => Self::IceCandidate(payload),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::IceConfig { .. } => "iceConfig",
            Self::UsersOnline(_) => "usersOnline",
            Self::ChatMessage(_) => "chat:message",
            Self::Offer(_) => SignalKind::Offer.as_str(),
            Self::Answer(_) => SignalKind::Answer.as_str(),
            Self::IceCandidate(_) => SignalKind::IceCandidate.as_str(),
        }
    }
}
