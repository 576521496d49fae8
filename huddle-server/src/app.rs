use crate::config::{Config, OriginPolicy};
use crate::hub::{Hub, HubHandle};
use crate::signaling;
use crate::transport::PeerSet;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use huddle_core::IceServerConfig;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
    pub peers: PeerSet,
    pub origins: Arc<OriginPolicy>,
}

impl AppState {
    /// Spawns the hub. Must be called inside a tokio runtime.
    pub fn new(ice_servers: Vec<IceServerConfig>, origins: OriginPolicy) -> Self {
        let peers = PeerSet::new();
        let hub = Hub::spawn(peers.clone(), ice_servers);

        Self {
            hub,
            peers,
            origins: Arc::new(origins),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, crate::RelayError> {
        Ok(Self::new(config.ice_servers(), config.origin_policy()?))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = state.origins.cors_layer();

    Router::new()
        .route("/ws", get(signaling::ws_handler))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "online": state.peers.len() }))
}
