//! UseCase: ルームの作成（`POST /api/rooms`）

use std::sync::Arc;

use atelier_shared::time::Clock;

use crate::domain::{
    DirectoryError, RoomDirectory, RoomIdFactory, RoomRecord, Timestamp, UserId,
};

use super::{error::CreateRoomError, notifier::RoomNotifier};

/// ルーム名の最大文字数
pub const MAX_ROOM_NAME_LEN: usize = 64;

/// ID 衝突時の再試行回数
const MAX_ID_ATTEMPTS: usize = 3;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    notifier: RoomNotifier,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        notifier: RoomNotifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_directory,
            notifier,
            clock,
        }
    }

    /// ルームを作成
    ///
    /// 作成者は記録されるが、ホストは最初の参加時に決まる。
    pub async fn execute(
        &self,
        name: String,
        creator: Option<String>,
        is_public: bool,
    ) -> Result<RoomRecord, CreateRoomError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CreateRoomError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_ROOM_NAME_LEN {
            return Err(CreateRoomError::NameTooLong {
                len,
                max: MAX_ROOM_NAME_LEN,
            });
        }
        let creator = creator.map(UserId::try_from).transpose()?;

        let now = Timestamp::new(self.clock.now_millis());
        let mut attempt = 0;
        let room = loop {
            attempt += 1;
            let mut room = RoomRecord::new(RoomIdFactory::generate(), name.clone(), creator.clone(), now);
            room.is_public = is_public;

            match self.room_directory.create_room(room.clone()).await {
                Ok(()) => break room,
                Err(DirectoryError::RoomAlreadyExists(id)) if attempt < MAX_ID_ATTEMPTS => {
                    tracing::debug!(room_id = %id, "Generated room id collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(room_id = %room.id, name = %room.name, "Room created");
        self.notifier.rooms_updated().await;
        Ok(room)
    }
}
