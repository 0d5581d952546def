//! UseCase: ルームへの招待

use std::sync::Arc;

use atelier_shared::time::Clock;

use crate::{
    domain::{RoomId, SessionComponents, UserId},
    infrastructure::dto::websocket::{RoomInviteReceivedPayload, ServerEvent},
};

use super::notifier::RoomNotifier;

/// 招待の内容
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInvite {
    pub from_user_id: UserId,
    pub from_username: String,
    pub to_user_id: UserId,
    pub room_id: RoomId,
    pub room_name: String,
}

/// ルーム招待のユースケース
pub struct SendRoomInviteUseCase {
    session: SessionComponents,
    notifier: RoomNotifier,
    clock: Arc<dyn Clock>,
}

impl SendRoomInviteUseCase {
    pub fn new(session: SessionComponents, notifier: RoomNotifier, clock: Arc<dyn Clock>) -> Self {
        Self {
            session,
            notifier,
            clock,
        }
    }

    /// 招待先のユーザーが接続中ならその接続にだけ通知する
    ///
    /// # Returns
    ///
    /// 招待が届けられた場合は `true`
    pub async fn execute(&self, invite: RoomInvite) -> bool {
        let target = self
            .session
            .registry
            .lock()
            .await
            .lookup_connection_for_user(&invite.to_user_id);

        let Some(target) = target else {
            tracing::info!(
                to_user_id = %invite.to_user_id,
                room_id = %invite.room_id,
                "Invitee is not online, dropping invite"
            );
            return false;
        };

        let event = ServerEvent::RoomInviteReceived(RoomInviteReceivedPayload {
            from_user_id: invite.from_user_id.to_string(),
            from_username: invite.from_username,
            room_id: invite.room_id.to_string(),
            room_name: invite.room_name,
            timestamp: self.clock.now_millis(),
        });
        let delivered = self.notifier.send_to(&target, &event).await;
        if delivered {
            tracing::info!(
                from_user_id = %invite.from_user_id,
                to_user_id = %invite.to_user_id,
                room_id = %invite.room_id,
                "Room invite sent"
            );
        }
        delivered
    }
}
