//! Connection ↔ user ↔ room bookkeeping.

use std::collections::HashMap;

use crate::domain::{ConnectionId, RoomId, UserId};

#[derive(Debug, Clone, Default)]
struct ConnectionEntry {
    user_id: Option<UserId>,
    room_id: Option<RoomId>,
}

/// What a connection was associated with when it went away
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisconnectedSession {
    pub user_id: Option<UserId>,
    pub room_id: Option<RoomId>,
}

/// Bidirectional maps between connections, users and rooms.
///
/// A user opening several connections is last-writer-wins for the reverse
/// `user → connection` lookup.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    user_to_connection: HashMap<UserId, ConnectionId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection with no user and no room
    pub fn on_connect(&mut self, connection_id: ConnectionId) {
        self.connections.entry(connection_id).or_default();
    }

    /// Associate a user with a connection
    pub fn identify(&mut self, connection_id: &ConnectionId, user_id: UserId) {
        let entry = self.connections.entry(connection_id.clone()).or_default();
        entry.user_id = Some(user_id.clone());
        self.user_to_connection
            .insert(user_id, connection_id.clone());
    }

    /// Record the room a connection has joined
    pub fn attach_room(&mut self, connection_id: &ConnectionId, room_id: RoomId) {
        if let Some(entry) = self.connections.get_mut(connection_id) {
            entry.room_id = Some(room_id);
        }
    }

    /// Forget the room of a connection, returning it
    pub fn detach_room(&mut self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.connections
            .get_mut(connection_id)
            .and_then(|entry| entry.room_id.take())
    }

    pub fn lookup_user(&self, connection_id: &ConnectionId) -> Option<UserId> {
        self.connections
            .get(connection_id)
            .and_then(|entry| entry.user_id.clone())
    }

    pub fn lookup_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.connections
            .get(connection_id)
            .and_then(|entry| entry.room_id.clone())
    }

    pub fn lookup_connection_for_user(&self, user_id: &UserId) -> Option<ConnectionId> {
        self.user_to_connection.get(user_id).cloned()
    }

    /// Remove every mapping of a connection.
    ///
    /// The reverse entry of its user is only dropped if it still points at
    /// this connection.
    pub fn on_disconnect(&mut self, connection_id: &ConnectionId) -> DisconnectedSession {
        let Some(entry) = self.connections.remove(connection_id) else {
            return DisconnectedSession::default();
        };

        if let Some(user_id) = &entry.user_id
            && self.user_to_connection.get(user_id) == Some(connection_id)
        {
            self.user_to_connection.remove(user_id);
        }

        DisconnectedSession {
            user_id: entry.user_id,
            room_id: entry.room_id,
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
