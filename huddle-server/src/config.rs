use crate::error::RelayError;
use axum::http::HeaderValue;
use clap::Parser;
use huddle_core::IceServerConfig;
use std::net::{IpAddr, SocketAddr};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Signaling and presence relay for WebRTC meetings
#[derive(Parser, Debug, Clone)]
#[command(name = "huddle", version, about)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Comma-separated allowed origins. Unset, empty or `*` allows any origin
    #[arg(long, env = "ORIGIN")]
    pub origin: Option<String>,

    /// Comma-separated STUN/TURN URLs handed to browsers
    #[arg(long, env = "TURN_URL")]
    pub turn_url: Option<String>,

    /// TURN username handed to browsers
    #[arg(long, env = "TURN_USER")]
    pub turn_user: Option<String>,

    /// TURN credential handed to browsers
    #[arg(long, env = "TURN_PASS", hide_env_values = true)]
    pub turn_pass: Option<String>,

    /// Emit structured JSON logs
    #[arg(long, env = "HUDDLE_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn origin_policy(&self) -> Result<OriginPolicy, RelayError> {
        OriginPolicy::parse(self.origin.as_deref())
    }

    /// ICE servers advertised to every peer on connect. Empty when no TURN
    /// URL is configured.
    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        let urls = split_list(self.turn_url.as_deref());
        if urls.is_empty() {
            return Vec::new();
        }

        vec![IceServerConfig {
            urls,
            username: self.turn_user.clone(),
            credential: self.turn_pass.clone(),
        }]
    }
}

/// Which browser origins may open a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    #[default]
    Any,
    List(Vec<HeaderValue>),
}

impl OriginPolicy {
    pub fn parse(raw: Option<&str>) -> Result<Self, RelayError> {
        let origins = split_list(raw);
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            return Ok(Self::Any);
        }

        origins
            .into_iter()
            .map(|origin| match HeaderValue::from_str(&origin) {
                Ok(value) => Ok(value),
                Err(source) => Err(RelayError::InvalidOrigin { origin, source }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }

    /// Requests without an `Origin` header come from non-browser clients and
    /// are let through.
    pub fn allows(&self, origin: Option<&HeaderValue>) -> bool {
        match (self, origin) {
            (Self::Any, _) | (_, None) => true,
            (Self::List(allowed), Some(origin)) => allowed.contains(origin),
        }
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let allow_origin = match self {
            Self::Any => AllowOrigin::from(Any),
            Self::List(allowed) => AllowOrigin::list(allowed.clone()),
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
