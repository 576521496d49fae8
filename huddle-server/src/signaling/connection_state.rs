/// Lifecycle of one connection. `Disconnected` is terminal; a reconnecting
/// peer is a brand-new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Identified,
    Disconnected,
}

impl ConnectionState {
    /// An identity announcement arrived. Re-announcing keeps `Identified`.
    pub fn identified(self) -> Self {
        match self {
            Self::Disconnected => Self::Disconnected,
            Self::Connected | Self::Identified => Self::Identified,
        }
    }

    pub fn closed(self) -> Self {
        Self::Disconnected
    }
}
