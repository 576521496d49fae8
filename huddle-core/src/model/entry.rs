use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};

/// One live connection as seen in a presence snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEntry {
    pub connection_id: ConnectionId,
    /// Empty until the peer announces itself.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ConnectionEntry {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            user_id: String::new(),
            display_name: None,
        }
    }

    pub fn is_identified(&self) -> bool {
        !self.user_id.is_empty()
    }
}
