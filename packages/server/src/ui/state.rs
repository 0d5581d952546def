//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, CreateRoomUseCase, DeleteRoomUseCase, DisconnectParticipantUseCase,
    GetRoomDetailUseCase, GetRoomsUseCase, IdentifyUserUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    RelayEventUseCase, SendRoomInviteUseCase,
};

/// Use cases reachable from the WebSocket and HTTP handlers
pub struct AppState {
    /// 接続の受付
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// 切断時の後片付け
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// `user-online`
    pub identify_user_usecase: Arc<IdentifyUserUseCase>,
    /// `join-room`
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// `leave-room`
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// 描画・カーソル・チャット・テーマ・音楽の中継
    pub relay_event_usecase: Arc<RelayEventUseCase>,
    /// `send-room-invite`
    pub send_room_invite_usecase: Arc<SendRoomInviteUseCase>,
    /// `room-deleted`（ホストによる削除）
    pub delete_room_usecase: Arc<DeleteRoomUseCase>,
    /// `POST /api/rooms`
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// `GET /api/rooms`
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// `GET /api/rooms/{room_id}`
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
