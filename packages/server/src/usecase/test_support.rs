//! ユースケースのテストで共有するフィクスチャ

use std::{sync::Arc, time::Duration};

use atelier_shared::time::FixedClock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{
        ConnectionId, DrawOp, RoomDirectory, RoomId, RoomRecord, SessionComponents, Timestamp,
        UserId,
    },
    infrastructure::{
        InMemoryRoomDirectory, InMemoryUserDirectory, WebSocketMessagePusher,
        dto::websocket::ServerEvent,
    },
};

use super::*;

/// フィクスチャの時計が返す時刻
pub const CLOCK_MILLIS: i64 = 1_700_000_000_000;

pub fn room(id: &str) -> RoomId {
    RoomId::try_from(id).unwrap()
}

pub fn user(id: &str) -> UserId {
    UserId::try_from(id).unwrap()
}

/// 接続済みのテストクライアントと、そこへ送信されたフレーム
pub struct TestClient {
    pub id: ConnectionId,
    pub user_id: Option<UserId>,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// これまでに送信されたイベントをすべて取り出す
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            events.push(serde_json::from_str(&frame).unwrap());
        }
        events
    }

    /// これまでに送信されたイベントをすべて取り出し、イベント名だけを返す
    pub fn drain_names(&mut self) -> Vec<&'static str> {
        self.drain().iter().map(ServerEvent::name).collect()
    }
}

/// インメモリのコンポーネントで組み立てた全ユースケース
pub struct TestHarness {
    pub session: SessionComponents,
    pub rooms: Arc<dyn RoomDirectory>,
    pub users: Arc<InMemoryUserDirectory>,
    pub connect: ConnectParticipantUseCase,
    pub identify: IdentifyUserUseCase,
    pub join_room: JoinRoomUseCase,
    pub leave_room: Arc<LeaveRoomUseCase>,
    pub disconnect: DisconnectParticipantUseCase,
    pub relay: RelayEventUseCase,
    pub send_room_invite: SendRoomInviteUseCase,
    pub delete_room: DeleteRoomUseCase,
    pub create_room: CreateRoomUseCase,
    pub get_rooms: GetRoomsUseCase,
    pub get_room_detail: GetRoomDetailUseCase,
    pub reaper: Arc<ReapEmptyRoomsUseCase>,
    pub seed: SeedDefaultRoomsUseCase,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_room_directory(Arc::new(InMemoryRoomDirectory::default()))
    }

    pub fn with_room_directory(rooms: Arc<dyn RoomDirectory>) -> Self {
        let session = SessionComponents::default();
        let users = Arc::new(InMemoryUserDirectory::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let clock = Arc::new(FixedClock::new(CLOCK_MILLIS));
        let notifier = RoomNotifier::new(pusher.clone(), session.occupancy.clone());
        let cleanup = RoomCleanup::new(
            rooms.clone(),
            session.clone(),
            notifier.clone(),
            Duration::ZERO,
            CancellationToken::new(),
        );
        let leave_room = Arc::new(LeaveRoomUseCase::new(
            rooms.clone(),
            users.clone(),
            session.clone(),
            notifier.clone(),
            cleanup.clone(),
        ));

        Self {
            connect: ConnectParticipantUseCase::new(pusher.clone(), session.clone()),
            identify: IdentifyUserUseCase::new(users.clone(), session.clone(), clock.clone()),
            join_room: JoinRoomUseCase::new(
                rooms.clone(),
                users.clone(),
                session.clone(),
                notifier.clone(),
                leave_room.clone(),
            ),
            disconnect: DisconnectParticipantUseCase::new(
                users.clone(),
                pusher.clone(),
                session.clone(),
                leave_room.clone(),
                clock.clone(),
            ),
            relay: RelayEventUseCase::new(
                rooms.clone(),
                session.clone(),
                notifier.clone(),
                clock.clone(),
            ),
            send_room_invite: SendRoomInviteUseCase::new(
                session.clone(),
                notifier.clone(),
                clock.clone(),
            ),
            delete_room: DeleteRoomUseCase::new(
                rooms.clone(),
                session.clone(),
                notifier.clone(),
                cleanup.clone(),
            ),
            create_room: CreateRoomUseCase::new(rooms.clone(), notifier.clone(), clock.clone()),
            get_rooms: GetRoomsUseCase::new(rooms.clone(), session.clone()),
            get_room_detail: GetRoomDetailUseCase::new(rooms.clone(), session.clone()),
            reaper: Arc::new(ReapEmptyRoomsUseCase::new(
                rooms.clone(),
                session.clone(),
                notifier,
                cleanup,
            )),
            seed: SeedDefaultRoomsUseCase::new(rooms.clone(), clock),
            leave_room,
            session,
            rooms,
            users,
        }
    }

    /// ユーザーを識別せずに接続を開く
    pub async fn connect_anonymous(&self) -> TestClient {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.connect.execute(tx).await;
        TestClient {
            id,
            user_id: None,
            rx,
        }
    }

    /// 接続を開き、`user_id` として識別する
    pub async fn connect_as(&self, user_id: &str) -> TestClient {
        let mut client = self.connect_anonymous().await;
        self.identify
            .execute(&client.id, user(user_id), Some(user_id.to_uppercase()))
            .await;
        client.user_id = Some(user(user_id));
        client
    }

    pub async fn join(&self, client: &TestClient, room_id: &str) -> JoinOutcome {
        self.join_room
            .execute(&client.id, client.user_id.clone(), room(room_id))
            .await
    }

    pub async fn create_room(&self, room_id: &str) {
        self.rooms
            .create_room(RoomRecord::new(
                room(room_id),
                room_id.to_string(),
                None,
                Timestamp::new(CLOCK_MILLIS),
            ))
            .await
            .unwrap();
    }

    pub async fn seed_default_rooms(&self) -> usize {
        self.seed.execute().await
    }

    pub fn draw_op(n: usize) -> DrawOp {
        DrawOp {
            x: n as f64,
            y: n as f64 * 2.0,
            prev_x: 0.0,
            prev_y: 0.0,
            color: "#222222".to_string(),
            size: 3.0,
            brush_type: "pencil".to_string(),
        }
    }
}
