//! UseCase 共通: 空ルームの削除
//!
//! ルームは次の条件をすべて満たす場合にのみ削除されます。
//!
//! - デフォルトルームでもロビーでもない
//! - ディレクトリから読み直した参加者リストが空
//! - ディレクトリの読み取り後に数えたライブ接続数が 0
//!
//! ルームの削除時には描画履歴も破棄します。

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::domain::{RoomDirectory, RoomId, SessionComponents, is_deletable_room};

use super::notifier::RoomNotifier;

/// 空判定の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// ルームを削除した
    Deleted,
    /// 使用中・保護対象、または判定に失敗したため残した
    Kept,
    /// 猶予期間後に判定を行う
    Deferred,
}

/// 退出・削除・定期掃除で共有する空ルームの削除処理
#[derive(Clone)]
pub struct RoomCleanup {
    room_directory: Arc<dyn RoomDirectory>,
    session: SessionComponents,
    notifier: RoomNotifier,
    grace: Duration,
    /// サーバー停止時にキャンセルされ、保留中の判定を取り消す
    shutdown: CancellationToken,
}

impl RoomCleanup {
    pub fn new(
        room_directory: Arc<dyn RoomDirectory>,
        session: SessionComponents,
        notifier: RoomNotifier,
        grace: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            room_directory,
            session,
            notifier,
            grace,
            shutdown,
        }
    }

    /// 空判定をすぐに、または猶予期間の経過後に行う
    ///
    /// 猶予期間後に削除した場合は `rooms-updated` もここで送信する。
    /// 猶予期間中にサーバーが停止した場合、判定は行わない。
    pub async fn check(&self, room_id: &RoomId) -> CleanupOutcome {
        if !is_deletable_room(room_id) {
            return CleanupOutcome::Kept;
        }

        if self.grace.is_zero() {
            return if self.delete_if_empty(room_id).await {
                CleanupOutcome::Deleted
            } else {
                CleanupOutcome::Kept
            };
        }

        let cleanup = self.clone();
        let room_id = room_id.clone();
        tracing::debug!(room_id = %room_id, grace = ?self.grace, "Deferring empty-room check");
        tokio::spawn(async move {
            tokio::select! {
                _ = cleanup.shutdown.cancelled() => {
                    tracing::debug!(room_id = %room_id, "Shutting down, dropping deferred empty-room check");
                }
                _ = tokio::time::sleep(cleanup.grace) => {
                    if cleanup.delete_if_empty(&room_id).await {
                        cleanup.notifier.rooms_updated().await;
                    }
                }
            }
        });
        CleanupOutcome::Deferred
    }

    /// 参加者とライブ接続の両方が空ならルームを削除し、削除したかどうかを返す
    pub async fn delete_if_empty(&self, room_id: &RoomId) -> bool {
        if !is_deletable_room(room_id) {
            return false;
        }

        let room = match self.room_directory.get_room(room_id).await {
            Ok(Some(room)) => room,
            Ok(None) => {
                // ディレクトリから消えている場合は、接続がなければ履歴だけ解放する
                if self.live_connections(room_id).await == 0 {
                    self.session.history.lock().await.discard(room_id);
                }
                return false;
            }
            Err(e) => {
                tracing::warn!(room_id = %room_id, "Failed to read room for cleanup: {}", e);
                return false;
            }
        };

        if !room.participants.is_empty() {
            tracing::debug!(
                room_id = %room_id,
                participants = room.participants.len(),
                "Room still has persisted participants, keeping it"
            );
            return false;
        }

        let live = self.live_connections(room_id).await;
        if live > 0 {
            tracing::debug!(room_id = %room_id, live, "Room still has live connections, keeping it");
            return false;
        }

        self.delete(room_id).await
    }

    /// 参加者に関係なくルームを削除する（デフォルトルームは拒否）
    pub async fn delete(&self, room_id: &RoomId) -> bool {
        if !is_deletable_room(room_id) {
            tracing::warn!(room_id = %room_id, "Refusing to delete a protected room");
            return false;
        }

        match self.room_directory.delete_room(room_id).await {
            Ok(removed) => {
                self.session.history.lock().await.discard(room_id);
                if removed {
                    tracing::info!(room_id = %room_id, "Room deleted");
                }
                removed
            }
            Err(e) => {
                tracing::error!(room_id = %room_id, "Failed to delete room: {}", e);
                false
            }
        }
    }

    async fn live_connections(&self, room_id: &RoomId) -> usize {
        self.session.occupancy.lock().await.count(room_id)
    }
}
