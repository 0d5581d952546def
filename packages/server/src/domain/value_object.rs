//! Value objects.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Room id of the lobby. Connections "in" it are tracked in memory, but it is
/// never persisted to the room directory and never deleted.
pub const UNSET_ROOM_ID: &str = "default";

const MAX_ID_LEN: usize = 128;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $empty:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, DomainError> {
                if value.trim().is_empty() {
                    return Err($empty);
                }
                let len = value.chars().count();
                if len > MAX_ID_LEN {
                    return Err(DomainError::TooLong {
                        kind: $kind,
                        len,
                        max: MAX_ID_LEN,
                    });
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = DomainError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of one live transport session
    ConnectionId,
    "connection id",
    DomainError::EmptyConnectionId
);

string_id!(
    /// Identifier of a user, as issued by the user directory
    UserId,
    "user id",
    DomainError::EmptyUserId
);

string_id!(
    /// Identifier of a room
    RoomId,
    "room id",
    DomainError::EmptyRoomId
);

impl ConnectionId {
    /// Generate a fresh connection id (UUID v4)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl RoomId {
    /// The lobby sentinel room
    pub fn unset() -> Self {
        Self(UNSET_ROOM_ID.to_string())
    }

    /// Room ids baked into the binary (default rooms)
    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }

    /// Whether this is the lobby sentinel (never persisted)
    pub fn is_unset(&self) -> bool {
        self.0 == UNSET_ROOM_ID
    }
}

/// Generates ids for user-created rooms.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Length of generated room ids
    pub const LENGTH: usize = 7;

    /// Generate a short random room id (lowercase hex)
    pub fn generate() -> RoomId {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        RoomId(simple[..Self::LENGTH].to_string())
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// One atomic stroke segment.
///
/// Coordinates live in the fixed virtual canvas space shared by every client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawOp {
    pub x: f64,
    pub y: f64,
    pub prev_x: f64,
    pub prev_y: f64,
    pub color: String,
    pub size: f64,
    #[serde(rename = "type")]
    pub brush_type: String,
}

/// Visual theme of a room.
///
/// Clients send richer theme objects (particles, colors, ...); fields other
/// than `id`, `name` and `background` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub background: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Theme {
    pub fn new(id: &str, name: &str, background: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            background: background.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}
