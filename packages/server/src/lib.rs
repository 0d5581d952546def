//! Atelier room synchronization server.
//!
//! Relays drawing, cursor, chat, theme and music events between the
//! connections of a room, replays canvas history to late joiners and keeps
//! room membership, host assignment and empty-room cleanup consistent with
//! the room/user directory.

pub mod bootstrap;
pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
