use axum::http::header::InvalidHeaderValue;
use huddle_core::ConnectionId;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum RelayError {
    /// A connection handle was registered twice while still alive.
    #[error("connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("relay hub is no longer running")]
    HubClosed,

    #[error("invalid allowed origin {origin:?}")]
    InvalidOrigin {
        origin: String,
        #[source]
        source: InvalidHeaderValue,
    },
}

impl<T> From<mpsc::error::SendError<T>> for RelayError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        Self::HubClosed
    }
}
