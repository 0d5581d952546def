//! UseCase: ホストによるルームの削除

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, RoomDirectory, RoomId, SessionComponents, is_deletable_room},
    infrastructure::dto::websocket::{RoomDeletedNotificationPayload, ServerEvent},
};

use super::{error::DeleteRoomError, notifier::RoomNotifier, room_cleanup::RoomCleanup};

const ROOM_DELETED_MESSAGE: &str = "The host has deleted this room";

/// ルーム削除のユースケース
pub struct DeleteRoomUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    session: SessionComponents,
    notifier: RoomNotifier,
    cleanup: RoomCleanup,
}

impl DeleteRoomUseCase {
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        session: SessionComponents,
        notifier: RoomNotifier,
        cleanup: RoomCleanup,
    ) -> Self {
        Self {
            room_directory,
            session,
            notifier,
            cleanup,
        }
    }

    /// ルームを削除
    ///
    /// 接続に識別されたユーザーがそのルームの現在のホストである場合のみ削除できる。
    /// デフォルトルームは削除できない。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) -> Result<(), DeleteRoomError> {
        let user_id = self
            .session
            .registry
            .lock()
            .await
            .lookup_user(connection_id)
            .ok_or(DeleteRoomError::NotIdentified)?;

        if !is_deletable_room(room_id) {
            return Err(DeleteRoomError::DefaultRoom(room_id.to_string()));
        }

        let room = self
            .room_directory
            .get_room(room_id)
            .await?
            .ok_or_else(|| DeleteRoomError::RoomNotFound(room_id.to_string()))?;

        if !room.is_host(&user_id) {
            return Err(DeleteRoomError::NotHost {
                user_id: user_id.to_string(),
                room_id: room_id.to_string(),
            });
        }

        let event = ServerEvent::RoomDeletedNotification(RoomDeletedNotificationPayload {
            room_id: room_id.to_string(),
            message: ROOM_DELETED_MESSAGE.to_string(),
        });
        self.notifier
            .send_to_room(room_id, &event, Some(connection_id))
            .await;

        self.cleanup.delete(room_id).await;
        tracing::info!(room_id = %room_id, user_id = %user_id, "Room deleted by host");

        self.notifier.rooms_updated().await;
        Ok(())
    }
}
