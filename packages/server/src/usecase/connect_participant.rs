//! UseCase: 接続の受付

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, SessionComponents};

/// 接続受付のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    session: SessionComponents,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, session: SessionComponents) -> Self {
        Self {
            message_pusher,
            session,
        }
    }

    /// 新しい接続を登録し、採番した接続 ID を返す
    ///
    /// 接続はユーザー・ルームと未関連付けの状態で登録される。
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();

        self.session
            .registry
            .lock()
            .await
            .on_connect(connection_id.clone());
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        connection_id
    }

    /// 接続中の接続数
    pub async fn count_connections(&self) -> usize {
        self.message_pusher.count_clients().await
    }
}
