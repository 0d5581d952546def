//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{DirectoryError, DomainError};

/// ホストによるルーム削除のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteRoomError {
    #[error("connection has not identified a user")]
    NotIdentified,

    #[error("room '{0}' is a default room and cannot be deleted")]
    DefaultRoom(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("user '{user_id}' is not the host of room '{room_id}'")]
    NotHost { user_id: String, room_id: String },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// ルーム作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("room name must not be empty")]
    EmptyName,

    #[error("room name is too long ({len} > {max} characters)")]
    NameTooLong { len: usize, max: usize },

    #[error("invalid creator: {0}")]
    InvalidCreator(#[from] DomainError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(#[from] DomainError),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
