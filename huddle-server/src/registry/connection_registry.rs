use crate::error::RelayError;
use huddle_core::{ConnectionEntry, ConnectionId, Identity};

/// What an announcement did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceOutcome {
    /// Empty identity, nothing changed.
    Ignored,
    /// The connection's own entry was overwritten.
    Updated,
    /// The connection had no entry and the user id was unknown.
    Inserted,
    /// The user id was held by another connection and moved here.
    Migrated { from: ConnectionId },
}

impl AnnounceOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Live connections and the identities they announced.
///
/// Entries keep insertion order; updates happen in place so a snapshot lists
/// peers in the order they arrived.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: Vec<ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly accepted connection with no identity yet.
    pub fn insert(&mut self, connection_id: ConnectionId) -> Result<(), RelayError> {
        if self.position(&connection_id).is_some() {
            return Err(RelayError::DuplicateConnection(connection_id));
        }

        self.entries.push(ConnectionEntry::new(connection_id));
        Ok(())
    }

    pub fn announce(&mut self, connection_id: ConnectionId, identity: &Identity) -> AnnounceOutcome {
        if identity.is_empty() {
            return AnnounceOutcome::Ignored;
        }

        let resolved = identity.resolve(&connection_id);

        if let Some(index) = self.position(&connection_id) {
            let entry = &mut self.entries[index];
            entry.user_id = resolved.user_id;
            entry.display_name = resolved.display_name;
            return AnnounceOutcome::Updated;
        }

        // Only the first holder moves, so a handle never appears twice.
        let holder = self
            .entries
            .iter()
            .position(|entry| entry.user_id == resolved.user_id);

        match holder {
            Some(index) => {
                let entry = &mut self.entries[index];
                let from = entry.connection_id;
                entry.connection_id = connection_id;
                entry.display_name = resolved.display_name;
                AnnounceOutcome::Migrated { from }
            }
            None => {
                self.entries.push(ConnectionEntry {
                    connection_id,
                    user_id: resolved.user_id,
                    display_name: resolved.display_name,
                });
                AnnounceOutcome::Inserted
            }
        }
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<ConnectionEntry> {
        let index = self.position(connection_id)?;
        Some(self.entries.remove(index))
    }

    pub fn snapshot(&self) -> Vec<ConnectionEntry> {
        self.entries.clone()
    }

    pub fn find_by_connection(&self, connection_id: &ConnectionId) -> Option<&ConnectionEntry> {
        self.entries
            .iter()
            .find(|entry| entry.connection_id == *connection_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, connection_id: &ConnectionId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.connection_id == *connection_id)
    }
}
