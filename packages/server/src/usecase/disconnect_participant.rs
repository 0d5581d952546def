//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時の退出処理とオフライン化
//!
//! ### なぜこのテストが必要か
//! - 切断は明示的な退出と同じ副作用（ホスト交代・ルーム削除・通知）を持つ必要がある
//! - 同じユーザーの新しい接続が残っている場合にオフラインにしてはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム参加中の切断
//! - エッジケース：ルーム未参加・未識別の切断、同一ユーザーの複数接続

use std::sync::Arc;

use atelier_shared::time::Clock;

use crate::domain::{
    ConnectionId, DisconnectedSession, MessagePusher, SessionComponents, Timestamp,
    UserDirectory,
};

use super::leave_room::LeaveRoomUseCase;

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    user_directory: Arc<dyn UserDirectory>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    session: SessionComponents,
    leave_room: Arc<LeaveRoomUseCase>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        user_directory: Arc<dyn UserDirectory>,
        message_pusher: Arc<dyn MessagePusher>,
        session: SessionComponents,
        leave_room: Arc<LeaveRoomUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_directory,
            message_pusher,
            session,
            leave_room,
            clock,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 切断された接続に関連付けられていたユーザーとルーム
    pub async fn execute(&self, connection_id: ConnectionId) -> DisconnectedSession {
        // 1. 以後のメッセージを破棄
        self.message_pusher.unregister_client(&connection_id).await;

        // 2. レジストリから削除
        let (disconnected, user_still_connected) = {
            let mut registry = self.session.registry.lock().await;
            let disconnected = registry.on_disconnect(&connection_id);
            let still_connected = disconnected
                .user_id
                .as_ref()
                .is_some_and(|user_id| registry.lookup_connection_for_user(user_id).is_some());
            (disconnected, still_connected)
        };

        // 3. ルームに参加していれば退出処理
        if let Some(room_id) = &disconnected.room_id {
            self.leave_room
                .leave(&connection_id, disconnected.user_id.clone(), room_id)
                .await;
        }

        // 4. オフライン化（同じユーザーの別の接続が残っている場合を除く）
        if let Some(user_id) = &disconnected.user_id {
            if user_still_connected {
                tracing::debug!(user_id = %user_id, "User still has another connection, staying online");
            } else {
                let now = Timestamp::new(self.clock.now_millis());
                if let Err(e) = self
                    .user_directory
                    .set_online(user_id, false, None, now)
                    .await
                {
                    tracing::warn!(user_id = %user_id, "Failed to mark user offline: {}", e);
                }
                if let Err(e) = self.user_directory.set_current_room(user_id, None).await {
                    tracing::warn!(user_id = %user_id, "Failed to clear current room: {}", e);
                }
            }
        }

        tracing::info!(connection_id = %connection_id, "Connection closed");
        disconnected
    }
}
