//! UseCase 層
//!
//! 操作ごとに 1 つのユースケースを置きます。`JoinRoomUseCase`・`LeaveRoomUseCase`・
//! `DisconnectParticipantUseCase` は `RoomCleanup` を共有し、接続ごとのルーム状態
//! （未参加 → 参加中 → 未参加）を遷移させます。

mod connect_participant;
mod create_room;
mod delete_room;
mod disconnect_participant;
mod error;
mod get_room_detail;
mod get_rooms;
mod identify_user;
mod join_room;
mod leave_room;
mod notifier;
mod reap_empty_rooms;
mod relay_event;
mod room_cleanup;
mod seed_default_rooms;
mod send_room_invite;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use create_room::{CreateRoomUseCase, MAX_ROOM_NAME_LEN};
pub use delete_room::DeleteRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{CreateRoomError, DeleteRoomError, GetRoomDetailError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::{GetRoomsUseCase, RoomOverview};
pub use identify_user::IdentifyUserUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use notifier::RoomNotifier;
pub use reap_empty_rooms::ReapEmptyRoomsUseCase;
pub use relay_event::RelayEventUseCase;
pub use room_cleanup::{CleanupOutcome, RoomCleanup};
pub use seed_default_rooms::SeedDefaultRoomsUseCase;
pub use send_room_invite::{RoomInvite, SendRoomInviteUseCase};
