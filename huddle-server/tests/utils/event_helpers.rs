use anyhow::{Context, Result, bail};
use huddle_core::{ConnectionEntry, ServerEvent};
use tokio_tungstenite::tungstenite::Message;

/// Timeout for a single expected event (ms).
pub const EVENT_TIMEOUT_MS: u64 = 2000;

/// Timeout for a WebSocket handshake or frame (ms).
pub const SOCKET_TIMEOUT_MS: u64 = 5000;

/// Builds an inbound frame the way a browser client would.
pub fn client_frame(event: &str, data: serde_json::Value) -> Message {
    let frame = serde_json::json!({ "event": event, "data": data });
    Message::Text(frame.to_string().into())
}

/// Decodes an outbound text frame into a server event.
pub fn decode_frame(message: Message) -> Result<ServerEvent> {
    let Message::Text(text) = message else {
        bail!("Expected a text frame, got {:?}", message);
    };
    serde_json::from_str(text.as_str()).context("Failed to decode server event")
}

pub fn presence(event: ServerEvent) -> Result<Vec<ConnectionEntry>> {
    match event {
        ServerEvent::UsersOnline(entries) => Ok(entries),
        other => bail!("Expected usersOnline, got {}", other.name()),
    }
}
