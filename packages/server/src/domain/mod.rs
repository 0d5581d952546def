//! Domain layer.
//!
//! Value objects, entities, the in-memory session components and the ports
//! (traits) that the use case layer depends on. Nothing here performs I/O.

pub mod default_rooms;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod session;
pub mod value_object;

pub use default_rooms::{DEFAULT_ROOMS, DefaultRoom, is_default_room, is_deletable_room};
pub use entity::{ParticipantRemoval, RoomRecord, UserRecord};
pub use error::{DirectoryError, DomainError, MessagePushError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{RoomDirectory, UserDirectory};
#[cfg(test)]
pub use repository::{MockRoomDirectory, MockUserDirectory};
pub use session::{
    CanvasHistoryStore, ConnectionRegistry, DEFAULT_HISTORY_CAPACITY, DisconnectedSession,
    RoomOccupancyTracker, SessionComponents,
};
pub use value_object::{
    ConnectionId, DrawOp, RoomId, RoomIdFactory, Theme, Timestamp, UNSET_ROOM_ID, UserId,
};
