//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("{kind} is too long ({len} > {max} characters)")]
    TooLong {
        kind: &'static str,
        len: usize,
        max: usize,
    },
}

/// Errors returned by the room/user directory ports.
///
/// The directory is an external collaborator; every call may fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room '{0}' already exists")]
    RoomAlreadyExists(String),

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by a `MessagePusher`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
