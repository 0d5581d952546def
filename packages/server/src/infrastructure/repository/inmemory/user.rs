//! InMemory User Directory 実装
//!
//! オンライン状態・現在のルーム・表示名のみを保持します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DirectoryError, RoomId, Timestamp, UserDirectory, UserId, UserRecord};

/// インメモリ User Directory 実装
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Arc<Mutex<HashMap<UserId, UserRecord>>>,
}

impl InMemoryUserDirectory {
    pub fn new(users: Arc<Mutex<HashMap<UserId, UserRecord>>>) -> Self {
        Self { users }
    }

    /// ユーザーのレコードを取得
    pub async fn get_user(&self, user_id: &UserId) -> Option<UserRecord> {
        self.users.lock().await.get(user_id).cloned()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn set_online(
        &self,
        user_id: &UserId,
        online: bool,
        username: Option<String>,
        now: Timestamp,
    ) -> Result<(), DirectoryError> {
        let mut users = self.users.lock().await;
        let user = users
            .entry(user_id.clone())
            .or_insert_with(|| UserRecord::new(user_id.clone(), None, now));
        user.online = online;
        user.last_seen = now;
        if username.is_some() {
            user.username = username;
        }
        Ok(())
    }

    async fn set_current_room(
        &self,
        user_id: &UserId,
        room_id: Option<RoomId>,
    ) -> Result<(), DirectoryError> {
        // 未登録のユーザーは無視する
        if let Some(user) = self.users.lock().await.get_mut(user_id) {
            user.current_room = room_id;
        }
        Ok(())
    }

    async fn find_username(&self, user_id: &UserId) -> Result<Option<String>, DirectoryError> {
        let users = self.users.lock().await;
        Ok(users.get(user_id).and_then(|user| user.username.clone()))
    }
}
