//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<kebab-case name>", "data": <payload>}`.
//! Events without a payload omit `data`.

use serde::{Deserialize, Serialize};

use crate::domain::{DrawOp, Theme};

// ========================================
// Client → Server
// ========================================

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    UserOnline(UserOnlinePayload),
    JoinRoom(RoomMembershipRequest),
    LeaveRoom(RoomMembershipRequest),
    Draw(DrawRequest),
    MouseMove(MouseMoveRequest),
    /// Payload is the bare room id
    ClearCanvas(String),
    RoomMessage(RoomMessageRequest),
    ChangeTheme(ChangeThemeRequest),
    MusicSync(MusicSyncPayload),
    SendRoomInvite(RoomInviteRequest),
    RoomDeleted(RoomDeletedRequest),
}

/// `user-online` accepts either a bare user id or a profile object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserOnlinePayload {
    UserId(String),
    #[serde(rename_all = "camelCase")]
    Profile {
        user_id: String,
        #[serde(default)]
        username: Option<String>,
    },
}

impl UserOnlinePayload {
    /// Split into the user id and the optional display name
    pub fn into_parts(self) -> (String, Option<String>) {
        match self {
            Self::UserId(user_id) => (user_id, None),
            Self::Profile { user_id, username } => (user_id, username),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMembershipRequest {
    pub room_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    pub room_id: String,
    pub x: f64,
    pub y: f64,
    pub prev_x: f64,
    pub prev_y: f64,
    pub color: String,
    pub size: f64,
    #[serde(rename = "type")]
    pub brush_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseMoveRequest {
    pub room_id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessageRequest {
    pub room_id: String,
    pub username: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeThemeRequest {
    pub room_id: String,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInviteRequest {
    pub from_user_id: String,
    pub from_username: String,
    pub to_user_id: String,
    pub room_id: String,
    pub room_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDeletedRequest {
    pub room_id: String,
}

// ========================================
// Server → Client
// ========================================

/// Events pushed to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    CanvasSync(Vec<DrawOp>),
    Draw(DrawOp),
    UserCursor(UserCursorPayload),
    ClearCanvas,
    RoomMessage(RoomMessagePayload),
    ThemeChanged(ThemeChangedPayload),
    MusicSync(MusicSyncPayload),
    PlayerJoined(PlayerJoinedPayload),
    PlayerLeft(PlayerLeftPayload),
    HostChanged(HostChangedPayload),
    RoomDeletedNotification(RoomDeletedNotificationPayload),
    RoomInviteReceived(RoomInviteReceivedPayload),
    RoomsUpdated,
}

impl ServerEvent {
    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::CanvasSync(_) => "canvas-sync",
            Self::Draw(_) => "draw",
            Self::UserCursor(_) => "user-cursor",
            Self::ClearCanvas => "clear-canvas",
            Self::RoomMessage(_) => "room-message",
            Self::ThemeChanged(_) => "theme-changed",
            Self::MusicSync(_) => "music-sync",
            Self::PlayerJoined(_) => "player-joined",
            Self::PlayerLeft(_) => "player-left",
            Self::HostChanged(_) => "host-changed",
            Self::RoomDeletedNotification(_) => "room-deleted-notification",
            Self::RoomInviteReceived(_) => "room-invite-received",
            Self::RoomsUpdated => "rooms-updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCursorPayload {
    pub room_id: String,
    pub x: f64,
    pub y: f64,
    pub username: Option<String>,
    pub conn_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessagePayload {
    pub room_id: String,
    pub username: String,
    pub message: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChangedPayload {
    pub room_id: String,
    pub theme: Theme,
}

/// Shared by both directions; `state` is opaque to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicSyncPayload {
    pub room_id: String,
    pub state: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerJoinedPayload {
    pub user_id: String,
    pub room_id: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLeftPayload {
    pub user_id: Option<String>,
    pub room_id: String,
    pub username: Option<String>,
    pub conn_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostChangedPayload {
    pub new_host: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDeletedNotificationPayload {
    pub room_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInviteReceivedPayload {
    pub from_user_id: String,
    pub from_username: String,
    pub room_id: String,
    pub room_name: String,
    pub timestamp: i64,
}
