mod connection_state;
mod ws_handler;

pub use connection_state::*;
pub use ws_handler::*;
