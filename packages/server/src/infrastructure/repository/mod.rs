//! Directory implementations.

pub mod inmemory;

pub use inmemory::{InMemoryRoomDirectory, InMemoryUserDirectory};
