//! Dependency wiring.

use std::{collections::HashMap, sync::Arc};

use atelier_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    domain::{RoomDirectory, SessionComponents, UserDirectory},
    infrastructure::{InMemoryRoomDirectory, InMemoryUserDirectory, WebSocketMessagePusher},
    ui::{Server, state::AppState},
    usecase::{
        ConnectParticipantUseCase, CreateRoomUseCase, DeleteRoomUseCase,
        DisconnectParticipantUseCase, GetRoomDetailUseCase, GetRoomsUseCase, IdentifyUserUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, ReapEmptyRoomsUseCase, RelayEventUseCase, RoomCleanup,
        RoomNotifier, SeedDefaultRoomsUseCase, SendRoomInviteUseCase,
    },
};

/// Build a server backed by the in-memory directories and the system clock
pub fn build_server(config: &ServerConfig) -> Server {
    build_server_with(
        config,
        Arc::new(InMemoryRoomDirectory::default()),
        Arc::new(InMemoryUserDirectory::default()),
        Arc::new(SystemClock),
    )
}

/// Build a server on top of the given directories and clock
pub fn build_server_with(
    config: &ServerConfig,
    room_directory: Arc<dyn RoomDirectory>,
    user_directory: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
) -> Server {
    // Initialize dependencies in order:
    // 1. Session components, shutdown token
    // 2. MessagePusher
    // 3. Shared collaborators (notifier, cleanup, leave)
    // 4. UseCases
    // 5. Server

    // 1. In-memory session state and the shutdown token shared by background work
    let shutdown = CancellationToken::new();
    let session = SessionComponents::new(config.history_capacity);

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Collaborators shared by several use cases
    let notifier = RoomNotifier::new(message_pusher.clone(), session.occupancy.clone());
    let cleanup = RoomCleanup::new(
        room_directory.clone(),
        session.clone(),
        notifier.clone(),
        config.empty_room_grace,
        shutdown.clone(),
    );
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        room_directory.clone(),
        user_directory.clone(),
        session.clone(),
        notifier.clone(),
        cleanup.clone(),
    ));

    // 4. UseCases
    let state = AppState {
        connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
            message_pusher.clone(),
            session.clone(),
        )),
        disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
            user_directory.clone(),
            message_pusher,
            session.clone(),
            leave_room_usecase.clone(),
            clock.clone(),
        )),
        identify_user_usecase: Arc::new(IdentifyUserUseCase::new(
            user_directory.clone(),
            session.clone(),
            clock.clone(),
        )),
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            room_directory.clone(),
            user_directory,
            session.clone(),
            notifier.clone(),
            leave_room_usecase.clone(),
        )),
        leave_room_usecase,
        relay_event_usecase: Arc::new(RelayEventUseCase::new(
            room_directory.clone(),
            session.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        send_room_invite_usecase: Arc::new(SendRoomInviteUseCase::new(
            session.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        delete_room_usecase: Arc::new(DeleteRoomUseCase::new(
            room_directory.clone(),
            session.clone(),
            notifier.clone(),
            cleanup.clone(),
        )),
        create_room_usecase: Arc::new(CreateRoomUseCase::new(
            room_directory.clone(),
            notifier.clone(),
            clock.clone(),
        )),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(
            room_directory.clone(),
            session.clone(),
        )),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(
            room_directory.clone(),
            session.clone(),
        )),
    };
    let seed_default_rooms_usecase =
        Arc::new(SeedDefaultRoomsUseCase::new(room_directory.clone(), clock));
    let reap_empty_rooms_usecase = Arc::new(ReapEmptyRoomsUseCase::new(
        room_directory,
        session,
        notifier,
        cleanup,
    ));

    // 5. Server
    Server::new(
        state,
        seed_default_rooms_usecase,
        reap_empty_rooms_usecase,
        config.reaper_interval,
        shutdown,
    )
}
