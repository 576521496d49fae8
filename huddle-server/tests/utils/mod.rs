pub mod event_helpers;
pub mod test_peer;

pub use event_helpers::*;
pub use test_peer::*;
