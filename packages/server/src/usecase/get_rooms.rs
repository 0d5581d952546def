//! UseCase: 公開ルーム一覧の取得

use std::sync::Arc;

use crate::domain::{DirectoryError, RoomDirectory, RoomRecord, SessionComponents};

/// ルームとそのライブ接続数
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOverview {
    pub room: RoomRecord,
    pub active_connections: usize,
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    session: SessionComponents,
}

impl GetRoomsUseCase {
    pub fn new(room_directory: Arc<dyn RoomDirectory>, session: SessionComponents) -> Self {
        Self {
            room_directory,
            session,
        }
    }

    /// 公開ルームを作成日時順に取得
    pub async fn execute(&self) -> Result<Vec<RoomOverview>, DirectoryError> {
        let rooms = self.room_directory.list_rooms().await?;

        let occupancy = self.session.occupancy.lock().await;
        Ok(rooms
            .into_iter()
            .filter(|room| room.is_public)
            .map(|room| RoomOverview {
                active_connections: occupancy.count(&room.id),
                room,
            })
            .collect())
    }
}
