//! Directory trait 定義
//!
//! ルーム／ユーザーのディレクトリ（外部の REST/DB 層）へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 冪等性
//!
//! 複数の接続が同じルームに対して並行に書き込むため、参加者の追加・削除と
//! ルームの削除はすべて冪等でなければなりません（`$addToSet` 相当）。

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{
    DirectoryError, ParticipantRemoval, RoomId, RoomRecord, Theme, Timestamp, UserId,
};

/// Room directory trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// 全てのルームを取得
    async fn list_rooms(&self) -> Result<Vec<RoomRecord>, DirectoryError>;

    /// ルームを取得（存在しない場合は `None`）
    async fn get_room(&self, room_id: &RoomId) -> Result<Option<RoomRecord>, DirectoryError>;

    /// ルームを新規作成（同じ ID が存在する場合はエラー）
    async fn create_room(&self, room: RoomRecord) -> Result<(), DirectoryError>;

    /// デフォルトルームを作成、または既存ルームのテーマと公開設定を更新
    async fn upsert_default_room(
        &self,
        room_id: RoomId,
        name: String,
        theme: Theme,
        now: Timestamp,
    ) -> Result<(), DirectoryError>;

    /// ルームを削除
    ///
    /// 存在しない場合も `Ok(false)` を返す（二重削除を許容）
    async fn delete_room(&self, room_id: &RoomId) -> Result<bool, DirectoryError>;

    /// 参加者を追加（重複しない）し、追加後のルームを返す
    async fn add_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<RoomRecord, DirectoryError>;

    /// 参加者を削除し、削除後のルームとホストの交代結果を返す
    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<ParticipantRemoval, DirectoryError>;

    /// ルームのテーマを更新
    async fn set_theme(&self, room_id: &RoomId, theme: Theme) -> Result<(), DirectoryError>;
}

/// User directory trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// オンライン状態を更新（未登録のユーザーは作成）
    ///
    /// `username` が `Some` の場合は表示名も更新する
    async fn set_online(
        &self,
        user_id: &UserId,
        online: bool,
        username: Option<String>,
        now: Timestamp,
    ) -> Result<(), DirectoryError>;

    /// 現在のルームを更新
    async fn set_current_room(
        &self,
        user_id: &UserId,
        room_id: Option<RoomId>,
    ) -> Result<(), DirectoryError>;

    /// 表示名を取得
    async fn find_username(&self, user_id: &UserId) -> Result<Option<String>, DirectoryError>;
}
