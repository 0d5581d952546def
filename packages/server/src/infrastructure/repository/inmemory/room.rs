//! InMemory Room Directory 実装
//!
//! ドメイン層が定義する `RoomDirectory` trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 参加者の追加は集合演算（重複なし）で行い、ホストの割り当て・引き継ぎは
//! `RoomRecord` のドメインロジックに委譲します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DirectoryError, ParticipantRemoval, RoomDirectory, RoomId, RoomRecord, Theme, Timestamp,
    UserId,
};

/// インメモリ Room Directory 実装
#[derive(Default)]
pub struct InMemoryRoomDirectory {
    rooms: Arc<Mutex<HashMap<RoomId, RoomRecord>>>,
}

impl InMemoryRoomDirectory {
    pub fn new(rooms: Arc<Mutex<HashMap<RoomId, RoomRecord>>>) -> Self {
        Self { rooms }
    }
}

fn not_found(room_id: &RoomId) -> DirectoryError {
    DirectoryError::RoomNotFound(room_id.to_string())
}

#[async_trait]
impl RoomDirectory for InMemoryRoomDirectory {
    async fn list_rooms(&self) -> Result<Vec<RoomRecord>, DirectoryError> {
        let rooms = self.rooms.lock().await;
        let mut records: Vec<RoomRecord> = rooms.values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Option<RoomRecord>, DirectoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room_id).cloned())
    }

    async fn create_room(&self, room: RoomRecord) -> Result<(), DirectoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.id) {
            return Err(DirectoryError::RoomAlreadyExists(room.id.to_string()));
        }
        rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn upsert_default_room(
        &self,
        room_id: RoomId,
        name: String,
        theme: Theme,
        now: Timestamp,
    ) -> Result<(), DirectoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| RoomRecord::new(room_id, name, None, now));
        room.is_public = true;
        room.theme = Some(theme);
        Ok(())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<bool, DirectoryError> {
        let mut rooms = self.rooms.lock().await;
        Ok(rooms.remove(room_id).is_some())
    }

    async fn add_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<RoomRecord, DirectoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        room.add_participant(user_id.clone());
        Ok(room.clone())
    }

    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<ParticipantRemoval, DirectoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        let new_host = room.remove_participant(user_id);
        Ok(ParticipantRemoval {
            room: room.clone(),
            new_host,
        })
    }

    async fn set_theme(&self, room_id: &RoomId, theme: Theme) -> Result<(), DirectoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| not_found(room_id))?;
        room.theme = Some(theme);
        Ok(())
    }
}
