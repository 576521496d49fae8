mod message_relay;

pub use message_relay::*;
