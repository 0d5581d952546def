//! Infrastructure layer.
//!
//! Concrete implementations of the domain ports and the wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;

pub use message_pusher::WebSocketMessagePusher;
pub use repository::{InMemoryRoomDirectory, InMemoryUserDirectory};
