//! UseCase: ルーム詳細の取得

use std::sync::Arc;

use crate::domain::{RoomDirectory, RoomId, SessionComponents};

use super::{error::GetRoomDetailError, get_rooms::RoomOverview};

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    session: SessionComponents,
}

impl GetRoomDetailUseCase {
    pub fn new(room_directory: Arc<dyn RoomDirectory>, session: SessionComponents) -> Self {
        Self {
            room_directory,
            session,
        }
    }

    /// ルーム詳細を取得（非公開ルームも ID 指定なら取得できる）
    pub async fn execute(&self, room_id: String) -> Result<RoomOverview, GetRoomDetailError> {
        let room_id = RoomId::try_from(room_id)?;

        let room = self
            .room_directory
            .get_room(&room_id)
            .await?
            .ok_or_else(|| GetRoomDetailError::RoomNotFound(room_id.to_string()))?;
        let active_connections = self.session.occupancy.lock().await.count(&room_id);

        Ok(RoomOverview {
            room,
            active_connections,
        })
    }
}
