//! UseCase: ルームからの退出
//!
//! 明示的な `leave-room`、別ルームへの参加（leave-before-join）、切断の
//! 3 つの経路から呼ばれます。各ステップは順番に await され、
//! ディレクトリの失敗はログに残した上で処理を継続します。

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, RoomDirectory, RoomId, SessionComponents, UserDirectory, UserId,
    },
    infrastructure::dto::websocket::{HostChangedPayload, PlayerLeftPayload, ServerEvent},
};

use super::{
    notifier::RoomNotifier,
    room_cleanup::{CleanupOutcome, RoomCleanup},
};

/// 退出処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 接続が指定されたルームに参加していなかった（何もしない）
    NotInRoom,
    Left {
        /// ルームが空になり削除された
        deleted: bool,
        /// ホストが交代した場合の新しいホスト
        new_host: Option<UserId>,
    },
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    user_directory: Arc<dyn UserDirectory>,
    session: SessionComponents,
    notifier: RoomNotifier,
    cleanup: RoomCleanup,
}

impl LeaveRoomUseCase {
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        user_directory: Arc<dyn UserDirectory>,
        session: SessionComponents,
        notifier: RoomNotifier,
        cleanup: RoomCleanup,
    ) -> Self {
        Self {
            room_directory,
            user_directory,
            session,
            notifier,
            cleanup,
        }
    }

    /// 明示的な `leave-room` を処理
    ///
    /// `room_id` が接続の現在のルームでない場合は何もしない。
    /// `user_id` が省略された場合は識別済みのユーザーを使う。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        user_id: Option<UserId>,
        room_id: &RoomId,
    ) -> LeaveOutcome {
        let (current_room, known_user) = {
            let registry = self.session.registry.lock().await;
            (
                registry.lookup_room(connection_id),
                registry.lookup_user(connection_id),
            )
        };

        if current_room.as_ref() != Some(room_id) {
            tracing::debug!(
                connection_id = %connection_id,
                room_id = %room_id,
                "Ignoring leave for a room the connection is not in"
            );
            return LeaveOutcome::NotInRoom;
        }

        self.leave(connection_id, user_id.or(known_user), room_id)
            .await
    }

    /// 退出処理の本体（現在のルームの確認は呼び出し側が行う）
    pub async fn leave(
        &self,
        connection_id: &ConnectionId,
        user_id: Option<UserId>,
        room_id: &RoomId,
    ) -> LeaveOutcome {
        // 1. ライブの在室状況とレジストリから外す
        let now_empty = self
            .session
            .occupancy
            .lock()
            .await
            .remove(room_id, connection_id);
        {
            let mut registry = self.session.registry.lock().await;
            if registry.lookup_room(connection_id).as_ref() == Some(room_id) {
                registry.detach_room(connection_id);
            }
        }
        tracing::debug!(connection_id = %connection_id, room_id = %room_id, now_empty, "Connection left room");

        // 2. 永続化された参加者から外す（同じユーザーの別接続が在室中なら残す）
        let mut new_host = None;
        let still_present = match &user_id {
            Some(user_id) => self.user_still_in_room(user_id, room_id).await,
            None => false,
        };
        if let Some(user_id) = &user_id
            && !room_id.is_unset()
            && !still_present
        {
            match self
                .room_directory
                .remove_participant(room_id, user_id)
                .await
            {
                Ok(removal) => new_host = removal.new_host,
                Err(e) => tracing::warn!(
                    room_id = %room_id,
                    user_id = %user_id,
                    "Failed to remove participant: {}",
                    e
                ),
            }
            if let Err(e) = self.user_directory.set_current_room(user_id, None).await {
                tracing::warn!(user_id = %user_id, "Failed to clear current room: {}", e);
            }
        }
        let username = self.find_username(user_id.as_ref()).await;

        // 3. 空になったルームの削除
        let deleted = self.cleanup.check(room_id).await == CleanupOutcome::Deleted;

        // 4. ホストの交代を通知
        if !deleted && let Some(new_host) = &new_host {
            tracing::info!(room_id = %room_id, new_host = %new_host, "Host changed");
            let event = ServerEvent::HostChanged(HostChangedPayload {
                new_host: new_host.to_string(),
            });
            self.notifier.send_to_room(room_id, &event, None).await;
        }

        // 5. 残りの接続に退出を通知
        let event = ServerEvent::PlayerLeft(PlayerLeftPayload {
            user_id: user_id.as_ref().map(ToString::to_string),
            room_id: room_id.to_string(),
            username,
            conn_id: connection_id.to_string(),
        });
        self.notifier
            .send_to_room(room_id, &event, Some(connection_id))
            .await;

        // 6. ルーム一覧の再取得を促す
        self.notifier.rooms_updated().await;

        LeaveOutcome::Left { deleted, new_host }
    }

    /// 同じユーザーの別の接続がまだルームに残っているか
    async fn user_still_in_room(&self, user_id: &UserId, room_id: &RoomId) -> bool {
        let connections = self.session.occupancy.lock().await.connections(room_id);
        let registry = self.session.registry.lock().await;
        connections
            .iter()
            .any(|connection_id| registry.lookup_user(connection_id).as_ref() == Some(user_id))
    }

    async fn find_username(&self, user_id: Option<&UserId>) -> Option<String> {
        let user_id = user_id?;
        self.user_directory
            .find_username(user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %user_id, "Failed to look up username: {}", e);
                None
            })
    }
}
