//! In-memory session state.
//!
//! The three components here are plain data structures with `&mut self`
//! methods. Each is owned by a `tokio::sync::Mutex` and shared with the use
//! cases through `SessionComponents`; callers never hold a lock across a
//! directory call.

mod canvas_history;
mod connection_registry;
mod room_occupancy;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use canvas_history::{CanvasHistoryStore, DEFAULT_HISTORY_CAPACITY};
pub use connection_registry::{ConnectionRegistry, DisconnectedSession};
pub use room_occupancy::RoomOccupancyTracker;

/// Shared handles to the in-memory session components.
///
/// Created once per server process and injected into every use case.
#[derive(Clone)]
pub struct SessionComponents {
    pub registry: Arc<Mutex<ConnectionRegistry>>,
    pub occupancy: Arc<Mutex<RoomOccupancyTracker>>,
    pub history: Arc<Mutex<CanvasHistoryStore>>,
}

impl SessionComponents {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(ConnectionRegistry::new())),
            occupancy: Arc::new(Mutex::new(RoomOccupancyTracker::new())),
            history: Arc::new(Mutex::new(CanvasHistoryStore::with_capacity(
                history_capacity,
            ))),
        }
    }
}

impl Default for SessionComponents {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
