//! Live connection sets per room.

use std::collections::{HashMap, HashSet};

use crate::domain::{ConnectionId, RoomId, is_deletable_room};

/// Per-room set of joined connections.
///
/// A connection belongs to at most one room; callers remove it from the old
/// room before adding it to the new one.
#[derive(Debug, Default)]
pub struct RoomOccupancyTracker {
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomOccupancyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room, creating the set if absent
    pub fn add(&mut self, room_id: RoomId, connection_id: ConnectionId) {
        self.rooms.entry(room_id).or_default().insert(connection_id);
    }

    /// Remove a connection from a room.
    ///
    /// Returns `true` when the room is now empty and is a room cleanup may
    /// delete. Emptied sets are dropped.
    pub fn remove(&mut self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let Some(connections) = self.rooms.get_mut(room_id) else {
            return false;
        };
        if !connections.remove(connection_id) {
            return false;
        }
        if !connections.is_empty() {
            return false;
        }

        self.rooms.remove(room_id);
        is_deletable_room(room_id)
    }

    pub fn count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map_or(0, HashSet::len)
    }

    /// Snapshot of the connections currently in a room
    pub fn connections(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|connections| connections.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Rooms that currently have at least one live connection
    pub fn rooms(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    pub fn contains(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|connections| connections.contains(connection_id))
    }
}
