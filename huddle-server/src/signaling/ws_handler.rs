use crate::app::AppState;
use crate::error::RelayError;
use crate::hub::HubHandle;
use crate::signaling::connection_state::ConnectionState;
use crate::transport::peer_channel;
use axum::extract::State;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientEvent, ConnectionId, Identity, SignalKind};
use tracing::{debug, error, info, warn};

/// Upgrades `/ws` requests. Browsers from origins outside the allow list are
/// turned away before the upgrade.
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let origin = headers.get(header::ORIGIN);
    if !state.origins.allows(origin) {
        warn!("Refusing WebSocket from origin {:?}", origin);
        return StatusCode::FORBIDDEN.into_response();
    }

    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state.hub)),
        Err(rejection) => rejection.into_response(),
    }
}

async fn handle_socket(socket: WebSocket, hub: HubHandle) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = peer_channel();

    if let Err(e) = hub.connect(connection_id, tx).await {
        error!("Rejecting {}: {}", connection_id, e);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize {} event: {}", event.name(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let hub = hub.clone();

        async move {
            let mut state = ConnectionState::Connected;

            while let Some(frame) = receiver.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        debug!("WebSocket error on {}: {}", connection_id, e);
                        break;
                    }
                };

                let event = match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Invalid event from {}: {}", connection_id, e);
                        continue;
                    }
                };

                match dispatch(&hub, connection_id, event, state).await {
                    Ok(next) => state = next,
                    Err(e) => {
                        error!("Hub died: {}", e);
                        break;
                    }
                }
            }

            state
        }
    });

    let last_state = tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            // Wait it out so no hub call lands after the disconnect.
            (&mut recv_task).await.ok()
        }
        res = (&mut recv_task) => {
            send_task.abort();
            res.ok()
        }
    };

    if let Err(e) = hub.disconnect(connection_id).await {
        warn!("Could not unregister {}: {}", connection_id, e);
    }
    info!(
        "WebSocket disconnected: {} ({:?} -> {:?})",
        connection_id,
        last_state,
        last_state.map(ConnectionState::closed)
    );
}

/// Forwards one decoded inbound event to the hub and returns the next state.
async fn dispatch(
    hub: &HubHandle,
    connection_id: ConnectionId,
    event: ClientEvent,
    state: ConnectionState,
) -> Result<ConnectionState, RelayError> {
    match event {
        ClientEvent::NewUser(payload) => {
            let Some(identity) = Identity::from_value(&payload) else {
                debug!("Ignoring empty identity from {}", connection_id);
                return Ok(state);
            };
            hub.announce(connection_id, identity).await?;

            let next = state.identified();
            if next != state {
                info!("Peer {} identified", connection_id);
            }
            Ok(next)
        }
        ClientEvent::ChatMessage(payload) => {
            hub.chat(connection_id, payload).await?;
            Ok(state)
        }
        ClientEvent::Offer(payload) => {
            hub.signal(connection_id, SignalKind::Offer, payload).await?;
            Ok(state)
        }
        ClientEvent::Answer(payload) => {
            hub.signal(connection_id, SignalKind::Answer, payload).await?;
            Ok(state)
        }
        ClientEvent::IceCandidate(payload) => {
            hub.signal(connection_id, SignalKind::IceCandidate, payload)
                .await?;
            Ok(state)
        }
    }
}
