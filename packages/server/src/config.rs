//! Runtime settings shared by the use cases.

use std::time::Duration;

use crate::domain::DEFAULT_HISTORY_CAPACITY;

/// Default interval of the empty-room reaper (30 minutes)
pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Server settings resolved from the command line / environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// How often the reaper sweeps persisted rooms
    pub reaper_interval: Duration,
    /// How long an emptied room is kept before the emptiness check runs.
    /// `Duration::ZERO` checks immediately.
    pub empty_room_grace: Duration,
    /// Maximum number of draw operations kept per room
    pub history_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            reaper_interval: DEFAULT_REAPER_INTERVAL,
            empty_room_grace: Duration::ZERO,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
