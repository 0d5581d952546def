//! UseCase: デフォルトルームの初期化

use std::sync::Arc;

use atelier_shared::time::Clock;

use crate::domain::{DEFAULT_ROOMS, RoomDirectory, Timestamp};

/// デフォルトルーム初期化のユースケース
pub struct SeedDefaultRoomsUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    clock: Arc<dyn Clock>,
}

impl SeedDefaultRoomsUseCase {
    pub fn new(room_directory: Arc<dyn RoomDirectory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            room_directory,
            clock,
        }
    }

    /// 全てのデフォルトルームを作成、またはテーマを更新し、成功した数を返す
    pub async fn execute(&self) -> usize {
        let now = Timestamp::new(self.clock.now_millis());
        let mut seeded = 0;

        for room in DEFAULT_ROOMS {
            match self
                .room_directory
                .upsert_default_room(room.room_id(), room.name.to_string(), room.theme(), now)
                .await
            {
                Ok(()) => seeded += 1,
                Err(e) => tracing::error!(room_id = room.room_id, "Failed to seed default room: {}", e),
            }
        }

        tracing::info!(seeded, "Default rooms initialized");
        seeded
    }
}
