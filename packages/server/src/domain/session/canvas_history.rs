//! Bounded per-room draw logs.

use std::collections::{HashMap, VecDeque};

use crate::domain::{DrawOp, RoomId};

/// Maximum number of draw operations kept per room
pub const DEFAULT_HISTORY_CAPACITY: usize = 10_000;

/// Per-room ordered log of draw operations, replayed to late joiners.
///
/// Insertion order is the only ordering guarantee. Once a log grows past its
/// capacity the oldest entries are evicted first.
#[derive(Debug)]
pub struct CanvasHistoryStore {
    capacity: usize,
    logs: HashMap<RoomId, VecDeque<DrawOp>>,
}

impl CanvasHistoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            logs: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a draw operation, evicting the oldest one past capacity
    pub fn append(&mut self, room_id: &RoomId, op: DrawOp) {
        let log = self.logs.entry(room_id.clone()).or_default();
        log.push_back(op);
        while log.len() > self.capacity {
            log.pop_front();
        }
    }

    /// Snapshot of the room's log in emission order
    pub fn replay(&self, room_id: &RoomId) -> Vec<DrawOp> {
        self.logs
            .get(room_id)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, room_id: &RoomId) -> usize {
        self.logs.get(room_id).map_or(0, VecDeque::len)
    }

    /// Empty the room's log (explicit clear)
    pub fn clear(&mut self, room_id: &RoomId) {
        if let Some(log) = self.logs.get_mut(room_id) {
            log.clear();
        }
    }

    /// Free the room's log entirely (room deleted)
    pub fn discard(&mut self, room_id: &RoomId) {
        self.logs.remove(room_id);
    }

    pub fn has_log(&self, room_id: &RoomId) -> bool {
        self.logs.contains_key(room_id)
    }

    /// Rooms that currently hold a log
    pub fn rooms(&self) -> Vec<RoomId> {
        self.logs.keys().cloned().collect()
    }
}

impl Default for CanvasHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
