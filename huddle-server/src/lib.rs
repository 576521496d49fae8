pub mod app;
pub mod config;
pub mod error;
pub mod hub;
pub mod presence;
pub mod registry;
pub mod relay;
pub mod signaling;
pub mod transport;

pub use app::{AppState, router};
pub use config::{Config, OriginPolicy};
pub use error::RelayError;
pub use hub::*;
pub use registry::*;
pub use signaling::*;
pub use transport::*;
