//! UseCase: ルームへの参加
//!
//! ## 処理の順序
//!
//! 1. 別のルームに参加中なら、そのルームの退出処理を完了させる（leave-before-join）
//! 2. 在室状況とレジストリに登録
//! 3. 参加者として永続化（ロビーは除く）
//! 4. 永続化に成功した場合のみ、他の接続に `player-joined` を通知
//! 5. 参加した接続にのみ `canvas-sync` を送信
//! 6. 全クライアントに `rooms-updated` を通知
//!
//! ユーザー ID がない場合や永続化に失敗した場合は「縮退した参加」となり、
//! 4 を省略して 5, 6 は実行する。

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionId, RoomDirectory, RoomId, SessionComponents, UserDirectory, UserId,
    },
    infrastructure::dto::websocket::{PlayerJoinedPayload, ServerEvent},
};

use super::{leave_room::LeaveRoomUseCase, notifier::RoomNotifier};

/// 参加処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// 参加が永続化され、他の接続に通知された
    Joined,
    /// 匿名、または永続化に失敗した参加
    Degraded,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    user_directory: Arc<dyn UserDirectory>,
    session: SessionComponents,
    notifier: RoomNotifier,
    leave_room: Arc<LeaveRoomUseCase>,
}

impl JoinRoomUseCase {
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        user_directory: Arc<dyn UserDirectory>,
        session: SessionComponents,
        notifier: RoomNotifier,
        leave_room: Arc<LeaveRoomUseCase>,
    ) -> Self {
        Self {
            room_directory,
            user_directory,
            session,
            notifier,
            leave_room,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続
    /// * `user_id` - 参加するユーザー（省略時は識別済みのユーザー）
    /// * `room_id` - 参加先のルーム
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        user_id: Option<UserId>,
        room_id: RoomId,
    ) -> JoinOutcome {
        // 1. 前のルームから退出
        let (previous_room, known_user) = {
            let registry = self.session.registry.lock().await;
            (
                registry.lookup_room(connection_id),
                registry.lookup_user(connection_id),
            )
        };
        let user_id = user_id.or(known_user);

        if let Some(previous_room) = previous_room
            && previous_room != room_id
        {
            self.leave_room
                .leave(connection_id, user_id.clone(), &previous_room)
                .await;
        }

        // 2. 在室状況とレジストリに登録
        self.session
            .occupancy
            .lock()
            .await
            .add(room_id.clone(), connection_id.clone());
        {
            let mut registry = self.session.registry.lock().await;
            if let Some(user_id) = &user_id {
                registry.identify(connection_id, user_id.clone());
            }
            registry.attach_room(connection_id, room_id.clone());
        }

        // 3, 4. 永続化と参加通知
        let outcome = match &user_id {
            Some(user_id) => self.persist_and_announce(connection_id, user_id, &room_id).await,
            None => {
                tracing::info!(
                    connection_id = %connection_id,
                    room_id = %room_id,
                    "Anonymous join, skipping persistence"
                );
                JoinOutcome::Degraded
            }
        };

        // 5. 履歴の再生（参加した接続にのみ送信）
        let history = self.session.history.lock().await.replay(&room_id);
        tracing::debug!(
            connection_id = %connection_id,
            room_id = %room_id,
            ops = history.len(),
            "Replaying canvas history"
        );
        self.notifier
            .send_to(connection_id, &ServerEvent::CanvasSync(history))
            .await;

        // 6. ルーム一覧の再取得を促す
        self.notifier.rooms_updated().await;

        outcome
    }

    async fn persist_and_announce(
        &self,
        connection_id: &ConnectionId,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> JoinOutcome {
        if !room_id.is_unset() {
            match self.room_directory.add_participant(room_id, user_id).await {
                Ok(room) => tracing::info!(
                    room_id = %room_id,
                    user_id = %user_id,
                    participants = room.participants.len(),
                    "User joined room"
                ),
                Err(e) => {
                    tracing::warn!(
                        room_id = %room_id,
                        user_id = %user_id,
                        "Failed to persist participant, join is degraded: {}",
                        e
                    );
                    return JoinOutcome::Degraded;
                }
            }

            if let Err(e) = self
                .user_directory
                .set_current_room(user_id, Some(room_id.clone()))
                .await
            {
                tracing::warn!(user_id = %user_id, "Failed to set current room: {}", e);
            }
        }

        let username = self
            .user_directory
            .find_username(user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %user_id, "Failed to look up username: {}", e);
                None
            });

        let event = ServerEvent::PlayerJoined(PlayerJoinedPayload {
            user_id: user_id.to_string(),
            room_id: room_id.to_string(),
            username,
        });
        self.notifier
            .send_to_room(room_id, &event, Some(connection_id))
            .await;

        JoinOutcome::Joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DirectoryError, MockRoomDirectory, RoomId},
        infrastructure::dto::websocket::ServerEvent,
        usecase::test_support::{TestHarness, room, user},
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - JoinRoomUseCase の参加処理と通知の宛先
    //
    // 【なぜこのテストが必要か】
    // - canvas-sync は参加者本人にのみ、player-joined は本人以外にのみ届く必要がある
    // - 別ルームへの移動で前のルームに接続が残らないことを保証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. 二人が同じルームに参加（シナリオ 1）
    // 2. 切断後に参加した接続への履歴の再生（シナリオ 2）
    // 3. ルーム A から B への移動（leave-before-join）
    // 4. 同じルームへの二重参加（冪等性）
    // 5. 匿名参加と永続化失敗時の縮退
    // ========================================

    #[tokio::test]
    async fn test_two_users_join_same_room() {
        // テスト項目: 二人が同じルームに参加すると、互いの player-joined だけを受け取る
        // given (前提条件):
        let harness = TestHarness::new();
        harness.create_room("r1").await;
        let mut a = harness.connect_as("user-a").await;
        let mut b = harness.connect_as("user-b").await;

        // when (操作):
        let first = harness.join(&a, "r1").await;
        let second = harness.join(&b, "r1").await;

        // then (期待する結果):
        assert_eq!(first, JoinOutcome::Joined);
        assert_eq!(second, JoinOutcome::Joined);
        let occupancy = harness.session.occupancy.lock().await;
        assert_eq!(occupancy.count(&room("r1")), 2);
        drop(occupancy);

        let stored = harness.rooms.get_room(&room("r1")).await.unwrap().unwrap();
        assert_eq!(stored.participants, vec![user("user-a"), user("user-b")]);
        assert_eq!(stored.host, Some(user("user-a")));

        let a_joined: Vec<String> = a
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                ServerEvent::PlayerJoined(payload) => Some(payload.user_id),
                _ => None,
            })
            .collect();
        let b_joined: Vec<String> = b
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                ServerEvent::PlayerJoined(payload) => Some(payload.user_id),
                _ => None,
            })
            .collect();
        assert_eq!(a_joined, vec!["user-b".to_string()]);
        assert!(b_joined.is_empty());
    }

    #[tokio::test]
    async fn test_late_joiner_receives_history_only_for_itself() {
        // テスト項目: 後から参加した接続だけが canvas-sync で履歴を受け取る
        // given (前提条件):
        let harness = TestHarness::new();
        harness.create_room("r1").await;
        let mut drawer = harness.connect_as("drawer").await;
        let mut watcher = harness.connect_as("watcher").await;
        harness.join(&drawer, "r1").await;
        harness.join(&watcher, "r1").await;
        for n in 0..10 {
            harness
                .relay
                .draw(&drawer.id, &room("r1"), TestHarness::draw_op(n))
                .await;
        }
        harness.disconnect.execute(drawer.id.clone()).await;
        drawer.drain();
        watcher.drain();
        let mut late = harness.connect_as("late").await;

        // when (操作):
        harness.join(&late, "r1").await;

        // then (期待する結果):
        let synced: Vec<_> = late
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                ServerEvent::CanvasSync(ops) => Some(ops),
                _ => None,
            })
            .collect();
        assert_eq!(synced, vec![(0..10).map(TestHarness::draw_op).collect::<Vec<_>>()]);
        assert!(!watcher.drain_names().contains(&"canvas-sync"));
        assert!(drawer.drain().is_empty());
    }

    #[tokio::test]
    async fn test_joining_another_room_leaves_previous_one() {
        // テスト項目: ルーム A から B に参加すると、A の在室状況・参加者から外れる
        // given (前提条件):
        let harness = TestHarness::new();
        harness.create_room("room-a").await;
        harness.create_room("room-b").await;
        let alice = harness.connect_as("alice").await;
        let mut bob = harness.connect_as("bob").await;
        harness.join(&alice, "room-a").await;
        harness.join(&bob, "room-a").await;
        bob.drain();

        // when (操作):
        harness.join(&alice, "room-b").await;

        // then (期待する結果):
        let occupancy = harness.session.occupancy.lock().await;
        assert!(!occupancy.contains(&room("room-a"), &alice.id));
        assert!(occupancy.contains(&room("room-b"), &alice.id));
        drop(occupancy);
        assert_eq!(
            harness.session.registry.lock().await.lookup_room(&alice.id),
            Some(room("room-b"))
        );
        let room_a = harness.rooms.get_room(&room("room-a")).await.unwrap().unwrap();
        assert_eq!(room_a.participants, vec![user("bob")]);
        assert_eq!(room_a.host, Some(user("bob")));
        assert!(bob.drain_names().contains(&"player-left"));
    }

    #[tokio::test]
    async fn test_rejoining_same_room_is_idempotent() {
        // テスト項目: 同じルームへの二重参加で参加者は重複しない
        // given (前提条件):
        let harness = TestHarness::new();
        harness.create_room("r1").await;
        let alice = harness.connect_as("alice").await;

        // when (操作):
        harness.join(&alice, "r1").await;
        harness.join(&alice, "r1").await;

        // then (期待する結果):
        let stored = harness.rooms.get_room(&room("r1")).await.unwrap().unwrap();
        assert_eq!(stored.participants, vec![user("alice")]);
        assert_eq!(harness.session.occupancy.lock().await.count(&room("r1")), 1);
    }

    #[tokio::test]
    async fn test_anonymous_join_is_degraded() {
        // テスト項目: ユーザー ID のない参加は永続化されず player-joined も送られないが、履歴は届く
        // given (前提条件):
        let harness = TestHarness::new();
        harness.create_room("r1").await;
        let mut member = harness.connect_as("member").await;
        harness.join(&member, "r1").await;
        member.drain();
        let mut anonymous = harness.connect_anonymous().await;

        // when (操作):
        let outcome = harness
            .join_room
            .execute(&anonymous.id, None, room("r1"))
            .await;

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::Degraded);
        assert_eq!(harness.session.occupancy.lock().await.count(&room("r1")), 2);
        assert_eq!(anonymous.drain_names(), vec!["canvas-sync", "rooms-updated"]);
        assert_eq!(member.drain_names(), vec!["rooms-updated"]);
    }

    #[tokio::test]
    async fn test_persistence_failure_suppresses_player_joined() {
        // テスト項目: 参加者の永続化に失敗すると player-joined は送られない
        // given (前提条件):
        let mut rooms = MockRoomDirectory::new();
        rooms
            .expect_add_participant()
            .returning(|_, _| Err(DirectoryError::Unavailable("down".to_string())));
        let harness = TestHarness::with_room_directory(Arc::new(rooms));
        let mut watcher = harness.connect_anonymous().await;
        harness
            .join_room
            .execute(&watcher.id, None, room("r1"))
            .await;
        watcher.drain();
        let mut alice = harness.connect_as("alice").await;

        // when (操作):
        let outcome = harness.join(&alice, "r1").await;

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::Degraded);
        assert_eq!(watcher.drain_names(), vec!["rooms-updated"]);
        assert!(alice.drain_names().contains(&"canvas-sync"));
    }

    #[tokio::test]
    async fn test_lobby_join_is_not_persisted() {
        // テスト項目: ロビー（"default"）への参加はディレクトリに書き込まれない
        // given (前提条件):
        let mut rooms = MockRoomDirectory::new();
        rooms.expect_add_participant().never();
        let harness = TestHarness::with_room_directory(Arc::new(rooms));
        let alice = harness.connect_as("alice").await;

        // when (操作):
        let outcome = harness
            .join_room
            .execute(&alice.id, None, RoomId::unset())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, JoinOutcome::Joined);
        assert_eq!(harness.session.occupancy.lock().await.count(&RoomId::unset()), 1);
    }
}
