//! UseCase: ルーム内イベントの中継
//!
//! 描画・カーソル・クリア・テーマ・音楽同期は送信者を除いて中継し、
//! チャットは送信者を含めて中継する（送信者自身も同じ経路で受け取る）。
//! 配信は at-most-once で、再送は行わない。

use std::sync::Arc;

use atelier_shared::time::Clock;

use crate::{
    domain::{ConnectionId, DrawOp, RoomDirectory, RoomId, SessionComponents, Theme},
    infrastructure::dto::websocket::{
        MusicSyncPayload, RoomMessagePayload, ServerEvent, ThemeChangedPayload, UserCursorPayload,
    },
};

use super::notifier::RoomNotifier;

/// ルーム内イベント中継のユースケース
pub struct RelayEventUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    session: SessionComponents,
    notifier: RoomNotifier,
    clock: Arc<dyn Clock>,
}

impl RelayEventUseCase {
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        session: SessionComponents,
        notifier: RoomNotifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_directory,
            session,
            notifier,
            clock,
        }
    }

    /// ルーム内の接続にイベントを中継し、送信対象数を返す
    pub async fn relay(
        &self,
        room_id: &RoomId,
        event: &ServerEvent,
        sender: &ConnectionId,
        include_sender: bool,
    ) -> usize {
        let exclude = (!include_sender).then_some(sender);
        self.notifier.send_to_room(room_id, event, exclude).await
    }

    /// 描画操作を履歴に追加し、送信者以外に中継
    ///
    /// 送信者が `room_id` に参加していない場合は履歴にも残さず破棄する。
    pub async fn draw(&self, sender: &ConnectionId, room_id: &RoomId, op: DrawOp) -> usize {
        if !self.is_in_room(sender, room_id).await {
            tracing::warn!(room_id = %room_id, connection_id = %sender, "Dropping draw from a connection outside the room");
            return 0;
        }
        self.session
            .history
            .lock()
            .await
            .append(room_id, op.clone());
        self.relay(room_id, &ServerEvent::Draw(op), sender, false)
            .await
    }

    /// カーソル位置を `user-cursor` として送信者以外に中継
    pub async fn cursor(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        x: f64,
        y: f64,
        username: Option<String>,
    ) -> usize {
        let event = ServerEvent::UserCursor(UserCursorPayload {
            room_id: room_id.to_string(),
            x,
            y,
            username,
            conn_id: sender.to_string(),
        });
        self.relay(room_id, &event, sender, false).await
    }

    /// 履歴を空にし、送信者以外に中継（参加していないルームへの要求は破棄）
    pub async fn clear_canvas(&self, sender: &ConnectionId, room_id: &RoomId) -> usize {
        if !self.is_in_room(sender, room_id).await {
            tracing::warn!(room_id = %room_id, connection_id = %sender, "Dropping clear from a connection outside the room");
            return 0;
        }
        self.session.history.lock().await.clear(room_id);
        tracing::info!(room_id = %room_id, connection_id = %sender, "Canvas cleared");
        self.relay(room_id, &ServerEvent::ClearCanvas, sender, false)
            .await
    }

    /// チャットメッセージにサーバー時刻を付けて、送信者を含むルーム全体に中継
    pub async fn room_message(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        username: String,
        message: String,
    ) -> usize {
        let event = ServerEvent::RoomMessage(RoomMessagePayload {
            room_id: room_id.to_string(),
            username,
            message,
            timestamp: self.clock.now_millis(),
        });
        self.relay(room_id, &event, sender, true).await
    }

    /// テーマを保存し（ロビーを除く）、`theme-changed` を送信者以外に中継
    pub async fn change_theme(&self, sender: &ConnectionId, room_id: &RoomId, theme: Theme) -> usize {
        if !room_id.is_unset()
            && let Err(e) = self.room_directory.set_theme(room_id, theme.clone()).await
        {
            tracing::warn!(room_id = %room_id, "Failed to persist theme: {}", e);
        }

        let event = ServerEvent::ThemeChanged(ThemeChangedPayload {
            room_id: room_id.to_string(),
            theme,
        });
        self.relay(room_id, &event, sender, false).await
    }

    /// 音楽の再生状態を送信者以外に中継
    pub async fn music_sync(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        state: serde_json::Value,
    ) -> usize {
        let event = ServerEvent::MusicSync(MusicSyncPayload {
            room_id: room_id.to_string(),
            state,
        });
        self.relay(room_id, &event, sender, false).await
    }

    async fn is_in_room(&self, sender: &ConnectionId, room_id: &RoomId) -> bool {
        self.session.registry.lock().await.lookup_room(sender).as_ref() == Some(room_id)
    }
}
