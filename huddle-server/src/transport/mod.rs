mod peer_set;

pub use peer_set::*;
