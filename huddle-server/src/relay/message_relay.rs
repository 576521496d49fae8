use crate::registry::ConnectionRegistry;
use crate::transport::PeerSet;
use chrono::{DateTime, SecondsFormat, Utc};
use huddle_core::{
    ChatPayload, ConnectionEntry, ConnectionId, OutgoingChatMessage, ServerEvent, SignalKind,
};
use serde_json::Value;
use tracing::{debug, info};

/// Relays a chat message to every peer, the sender included.
///
/// Blank messages are dropped without telling anyone. Returns how many peers
/// the message was queued for.
pub fn relay_chat(
    registry: &ConnectionRegistry,
    peers: &PeerSet,
    connection_id: &ConnectionId,
    payload: ChatPayload,
) -> usize {
    let sender = registry.find_by_connection(connection_id);

    let Some(message) = build_chat_message(sender, connection_id, payload, Utc::now()) else {
        debug!("Dropping blank chat message from {}", connection_id);
        return 0;
    };

    info!(
        "Relayed chat message from {} ({} chars)",
        message.user_id,
        message.message.chars().count()
    );
    peers.broadcast(&ServerEvent::ChatMessage(message))
}

/// Relays a signaling payload verbatim to every peer except its sender.
pub fn relay_signal(
    peers: &PeerSet,
    connection_id: &ConnectionId,
    kind: SignalKind,
    payload: Value,
) -> usize {
    let delivered = peers.broadcast_except(connection_id, &ServerEvent::signal(kind, payload));
    debug!("Relayed {} from {} to {} peers", kind, connection_id, delivered);
    delivered
}

/// Normalizes an inbound chat payload.
///
/// The stored display name of the sender beats any name in the payload; an
/// unknown sender falls back to its connection handle as user id.
pub fn build_chat_message(
    sender: Option<&ConnectionEntry>,
    connection_id: &ConnectionId,
    payload: ChatPayload,
    now: DateTime<Utc>,
) -> Option<OutgoingChatMessage> {
    let message = payload.message.as_deref().unwrap_or_default().trim();
    if message.is_empty() {
        return None;
    }

    let user_id = payload
        .user_id
        .filter(|id| !id.is_empty())
        .or_else(|| sender.filter(|s| s.is_identified()).map(|s| s.user_id.clone()))
        .unwrap_or_else(|| connection_id.to_string());

    let name = sender
        .and_then(|s| s.display_name.clone())
        .or(payload.name)
        .or(payload.display_name);

    Some(OutgoingChatMessage {
        user_id,
        name,
        message: message.to_owned(),
        timestamp: payload.timestamp.unwrap_or_else(|| iso_timestamp(now)),
        client_id: payload.client_id,
    })
}

/// `2024-05-01T12:00:00.000Z`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
