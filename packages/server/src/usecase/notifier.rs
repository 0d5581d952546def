//! UseCase 共通: 接続へのイベント配信
//!
//! イベントは一度だけシリアライズし、ベストエフォートで送信します。
//! ある接続への送信に失敗してもログに残すだけで、残りの配信は続けます。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePusher, RoomId, RoomOccupancyTracker},
    infrastructure::dto::websocket::ServerEvent,
};

/// ルーム単位および全体へのイベント配信
#[derive(Clone)]
pub struct RoomNotifier {
    message_pusher: Arc<dyn MessagePusher>,
    occupancy: Arc<Mutex<RoomOccupancyTracker>>,
}

impl RoomNotifier {
    pub fn new(
        message_pusher: Arc<dyn MessagePusher>,
        occupancy: Arc<Mutex<RoomOccupancyTracker>>,
    ) -> Self {
        Self {
            message_pusher,
            occupancy,
        }
    }

    fn encode(event: &ServerEvent) -> Option<String> {
        match serde_json::to_string(event) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!(event = event.name(), "Failed to serialize event: {}", e);
                None
            }
        }
    }

    /// 単一の接続にイベントを送信する
    pub async fn send_to(&self, connection_id: &ConnectionId, event: &ServerEvent) -> bool {
        let Some(json) = Self::encode(event) else {
            return false;
        };

        match self.message_pusher.push_to(connection_id, &json).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    event = event.name(),
                    "Failed to push event: {}",
                    e
                );
                false
            }
        }
    }

    /// ルーム内の全接続にイベントを送信する（`skip` の接続は除く）
    ///
    /// 送信対象になった接続数を返す。
    pub async fn send_to_room(
        &self,
        room_id: &RoomId,
        event: &ServerEvent,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        let targets: Vec<ConnectionId> = {
            let occupancy = self.occupancy.lock().await;
            occupancy
                .connections(room_id)
                .into_iter()
                .filter(|connection_id| Some(connection_id) != exclude)
                .collect()
        };

        if targets.is_empty() {
            return 0;
        }
        let Some(json) = Self::encode(event) else {
            return 0;
        };

        let count = targets.len();
        if let Err(e) = self.message_pusher.broadcast(targets, &json).await {
            tracing::warn!(room_id = %room_id, event = event.name(), "Broadcast failed: {}", e);
        }
        count
    }

    /// 接続中の全クライアントにイベントを送信する
    pub async fn send_to_all(&self, event: &ServerEvent) {
        let Some(json) = Self::encode(event) else {
            return;
        };

        if let Err(e) = self.message_pusher.broadcast_all(&json).await {
            tracing::warn!(event = event.name(), "Broadcast to all failed: {}", e);
        }
    }

    /// 公開ルーム一覧の再取得を全クライアントに促す
    pub async fn rooms_updated(&self) {
        self.send_to_all(&ServerEvent::RoomsUpdated).await;
    }
}
