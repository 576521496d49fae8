mod chat;
mod connection;
mod entry;
mod event;
mod identity;
mod signaling;

pub use chat::{ChatPayload, OutgoingChatMessage};
pub use connection::ConnectionId;
pub use entry::ConnectionEntry;
pub use event::{ClientEvent, ServerEvent};
pub use identity::{Identity, ResolvedIdentity};
pub use signaling::{IceServerConfig, SignalKind};
