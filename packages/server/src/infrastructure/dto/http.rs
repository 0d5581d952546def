//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::Theme;

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub connections: usize,
}

/// An entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    pub host: Option<String>,
    pub participants: Vec<String>,
    pub active_connections: usize,
    pub theme: Option<Theme>,
    pub created_at: String,
}

/// `GET /api/rooms/{roomId}` and `POST /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub creator: Option<String>,
    pub is_public: bool,
    pub host: Option<String>,
    pub participants: Vec<String>,
    pub active_connections: usize,
    pub theme: Option<Theme>,
    pub created_at: String,
}

/// Body of `POST /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}
