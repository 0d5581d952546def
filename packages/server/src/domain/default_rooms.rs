//! Pre-seeded rooms that must never be deleted by cleanup.

use super::value_object::{RoomId, Theme};

/// A pre-seeded room and its theme
#[derive(Debug, Clone, Copy)]
pub struct DefaultRoom {
    pub room_id: &'static str,
    pub name: &'static str,
    pub theme_id: &'static str,
    pub theme_name: &'static str,
    pub background: &'static str,
}

impl DefaultRoom {
    pub fn room_id(&self) -> RoomId {
        RoomId::from_static(self.room_id)
    }

    pub fn theme(&self) -> Theme {
        Theme::new(self.theme_id, self.theme_name, self.background)
    }
}

/// The allow-list of default rooms.
pub const DEFAULT_ROOMS: [DefaultRoom; 5] = [
    DefaultRoom {
        room_id: "default_room_1",
        name: "Art Studio",
        theme_id: "sunset",
        theme_name: "Sunset Beach",
        background: "linear-gradient(135deg, #FF6B6B 0%, #FFE66D 50%, #4ECDC4 100%)",
    },
    DefaultRoom {
        room_id: "default_room_2",
        name: "Ocean Lounge",
        theme_id: "ocean",
        theme_name: "Deep Ocean",
        background: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
    },
    DefaultRoom {
        room_id: "default_room_3",
        name: "Forest Canvas",
        theme_id: "forest",
        theme_name: "Mystic Forest",
        background: "linear-gradient(135deg, #134E5E 0%, #71B280 100%)",
    },
    DefaultRoom {
        room_id: "default_room_4",
        name: "Space Gallery",
        theme_id: "space",
        theme_name: "Cosmic Space",
        background: "linear-gradient(135deg, #0F2027 0%, #203A43 50%, #2C5364 100%)",
    },
    DefaultRoom {
        room_id: "default_room_5",
        name: "Candy Workshop",
        theme_id: "candy",
        theme_name: "Candy Land",
        background: "linear-gradient(135deg, #FFB6C1 0%, #FFC0CB 50%, #DDA0DD 100%)",
    },
];

/// Whether `room_id` is in the default-room allow-list
pub fn is_default_room(room_id: &RoomId) -> bool {
    DEFAULT_ROOMS
        .iter()
        .any(|room| room.room_id == room_id.as_str())
}

/// Whether cleanup is allowed to delete `room_id`.
///
/// Every deletion path consults this.
pub fn is_deletable_room(room_id: &RoomId) -> bool {
    !is_default_room(room_id) && !room_id.is_unset()
}
