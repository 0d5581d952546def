//! UseCase: 空ルームの定期削除
//!
//! 起動時に一度、その後は一定間隔で、ライブ接続のない永続化済みルーム
//! （デフォルトルームを除く）を削除します。個々の退出処理で削除し損ねた
//! ルームを回収するためのバックストップです。
//!
//! ディレクトリに存在せずライブ接続もないルームの描画履歴も同じタイミングで破棄します。

use std::{collections::HashSet, sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::domain::{RoomDirectory, RoomId, SessionComponents, is_deletable_room};

use super::{notifier::RoomNotifier, room_cleanup::RoomCleanup};

/// 空ルーム削除のユースケース
pub struct ReapEmptyRoomsUseCase {
    room_directory: Arc<dyn RoomDirectory>,
    session: SessionComponents,
    notifier: RoomNotifier,
    cleanup: RoomCleanup,
}

impl ReapEmptyRoomsUseCase {
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        session: SessionComponents,
        notifier: RoomNotifier,
        cleanup: RoomCleanup,
    ) -> Self {
        Self {
            room_directory,
            session,
            notifier,
            cleanup,
        }
    }

    /// 一度だけ掃除を行い、削除したルーム数を返す
    pub async fn execute(&self) -> usize {
        let rooms = match self.room_directory.list_rooms().await {
            Ok(rooms) => rooms,
            Err(e) => {
                tracing::error!("Failed to list rooms for cleanup: {}", e);
                return 0;
            }
        };

        let mut deleted = 0;
        for room in rooms.iter().filter(|room| is_deletable_room(&room.id)) {
            let live = self.session.occupancy.lock().await.count(&room.id);
            if live > 0 {
                continue;
            }
            if self.cleanup.delete(&room.id).await {
                deleted += 1;
            }
        }

        let known: HashSet<_> = rooms.into_iter().map(|room| room.id).collect();
        let discarded = self.discard_orphan_histories(&known).await;
        if discarded > 0 {
            tracing::info!(discarded, "Discarded canvas histories of unknown rooms");
        }

        if deleted > 0 {
            tracing::info!(deleted, "Removed empty rooms");
            self.notifier.rooms_updated().await;
        } else {
            tracing::debug!("No empty rooms to remove");
        }
        deleted
    }

    /// ディレクトリにないルームのうち、ライブ接続のないものの履歴を破棄する
    ///
    /// 在室状況のロックを保持したまま破棄するため、判定後に参加した接続の履歴は消えない。
    async fn discard_orphan_histories(&self, known: &HashSet<RoomId>) -> usize {
        let occupancy = self.session.occupancy.lock().await;
        let mut history = self.session.history.lock().await;

        let orphans: Vec<RoomId> = history
            .rooms()
            .into_iter()
            .filter(|room_id| !known.contains(room_id) && occupancy.count(room_id) == 0)
            .collect();
        for room_id in &orphans {
            history.discard(room_id);
        }
        orphans.len()
    }

    /// 起動直後と `interval` ごとに掃除を行うタスクを起動する
    ///
    /// `cancel` がキャンセルされるとタスクは終了する。
    pub fn spawn(self: Arc<Self>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Room reaper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.execute().await;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TestHarness, room};

    #[tokio::test]
    async fn test_reaper_removes_only_unoccupied_user_rooms() {
        // テスト項目: 接続のないユーザールームだけが削除され、デフォルトルームと使用中のルームは残る
        // given (前提条件):
        let harness = TestHarness::new();
        harness.seed_default_rooms().await;
        harness.create_room("orphan").await;
        harness.create_room("busy").await;
        let alice = harness.connect_as("alice").await;
        harness.join(&alice, "busy").await;
        let mut watcher = harness.connect_anonymous().await;

        // when (操作):
        let deleted = harness.reaper.execute().await;

        // then (期待する結果):
        assert_eq!(deleted, 1);
        assert_eq!(harness.rooms.get_room(&room("orphan")).await, Ok(None));
        assert!(harness.rooms.get_room(&room("busy")).await.unwrap().is_some());
        assert_eq!(harness.rooms.list_rooms().await.unwrap().len(), 6);
        assert_eq!(watcher.drain_names(), vec!["rooms-updated"]);
    }

    #[tokio::test]
    async fn test_reaper_without_work_stays_quiet() {
        // テスト項目: 削除対象がない場合は rooms-updated を送らない
        // given (前提条件):
        let harness = TestHarness::new();
        harness.seed_default_rooms().await;
        let mut watcher = harness.connect_anonymous().await;

        // when (操作):
        let deleted = harness.reaper.execute().await;

        // then (期待する結果):
        assert_eq!(deleted, 0);
        assert!(watcher.drain().is_empty());
    }

    #[tokio::test]
    async fn test_reaper_discards_histories_of_unknown_rooms() {
        // テスト項目: ディレクトリにないルームの履歴は、接続が残っていなければ破棄される
        // given (前提条件):
        let harness = TestHarness::new();
        let gone = harness.connect_as("gone").await;
        let stay = harness.connect_as("stay").await;
        harness.join(&gone, "vanished").await;
        harness.join(&stay, "unlisted").await;
        harness
            .relay
            .draw(&gone.id, &room("vanished"), TestHarness::draw_op(1))
            .await;
        harness
            .relay
            .draw(&stay.id, &room("unlisted"), TestHarness::draw_op(2))
            .await;
        harness
            .session
            .occupancy
            .lock()
            .await
            .remove(&room("vanished"), &gone.id);

        // when (操作):
        harness.reaper.execute().await;

        // then (期待する結果):
        let history = harness.session.history.lock().await;
        assert!(!history.has_log(&room("vanished")));
        assert_eq!(history.replay(&room("unlisted")), vec![TestHarness::draw_op(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_reaper_runs_at_startup_and_stops_on_cancel() {
        // テスト項目: 起動直後に一度実行され、キャンセルで停止する
        // given (前提条件):
        let harness = TestHarness::new();
        harness.create_room("orphan").await;
        let cancel = CancellationToken::new();

        // when (操作):
        let handle = harness
            .reaper
            .clone()
            .spawn(Duration::from_secs(1800), cancel.clone());
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();

        // then (期待する結果):
        assert!(handle.await.is_ok());
        assert_eq!(harness.rooms.get_room(&room("orphan")).await, Ok(None));
    }
}
