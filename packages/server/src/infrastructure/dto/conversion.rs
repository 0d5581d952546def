//! Conversion logic between DTOs and domain types.

use atelier_shared::time::timestamp_to_rfc3339;

use crate::domain::{DrawOp, RoomRecord};
use crate::infrastructure::dto::{
    http::{RoomDetailDto, RoomSummaryDto},
    websocket::DrawRequest,
};

// ========================================
// DTO → Domain
// ========================================

impl From<DrawRequest> for DrawOp {
    fn from(dto: DrawRequest) -> Self {
        Self {
            x: dto.x,
            y: dto.y,
            prev_x: dto.prev_x,
            prev_y: dto.prev_y,
            color: dto.color,
            size: dto.size,
            brush_type: dto.brush_type,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

fn user_ids(room: &RoomRecord) -> Vec<String> {
    room.participants.iter().map(ToString::to_string).collect()
}

/// Build a listing entry from a room record and its live connection count
pub fn to_room_summary(room: RoomRecord, active_connections: usize) -> RoomSummaryDto {
    RoomSummaryDto {
        participants: user_ids(&room),
        id: room.id.into_string(),
        name: room.name,
        host: room.host.map(String::from),
        active_connections,
        theme: room.theme,
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    }
}

/// Build a room detail from a room record and its live connection count
pub fn to_room_detail(room: RoomRecord, active_connections: usize) -> RoomDetailDto {
    RoomDetailDto {
        participants: user_ids(&room),
        id: room.id.into_string(),
        name: room.name,
        creator: room.creator.map(String::from),
        is_public: room.is_public,
        host: room.host.map(String::from),
        active_connections,
        theme: room.theme,
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    }
}
