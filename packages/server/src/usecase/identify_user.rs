//! UseCase: ユーザーの識別（`user-online`）

use std::sync::Arc;

use atelier_shared::time::Clock;

use crate::domain::{ConnectionId, SessionComponents, Timestamp, UserDirectory, UserId};

/// ユーザー識別のユースケース
pub struct IdentifyUserUseCase {
    user_directory: Arc<dyn UserDirectory>,
    session: SessionComponents,
    clock: Arc<dyn Clock>,
}

impl IdentifyUserUseCase {
    pub fn new(
        user_directory: Arc<dyn UserDirectory>,
        session: SessionComponents,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_directory,
            session,
            clock,
        }
    }

    /// 接続にユーザーを関連付け、オンライン状態にする
    ///
    /// ディレクトリの更新に失敗しても関連付けは維持される。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        user_id: UserId,
        username: Option<String>,
    ) {
        self.session
            .registry
            .lock()
            .await
            .identify(connection_id, user_id.clone());

        let now = Timestamp::new(self.clock.now_millis());
        match self
            .user_directory
            .set_online(&user_id, true, username, now)
            .await
        {
            Ok(()) => tracing::info!(user_id = %user_id, connection_id = %connection_id, "User is online"),
            Err(e) => tracing::warn!(user_id = %user_id, "Failed to mark user online: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DirectoryError, MockUserDirectory},
        infrastructure::InMemoryUserDirectory,
    };
    use atelier_shared::time::FixedClock;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::try_from(id).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::try_from(id).unwrap()
    }

    #[tokio::test]
    async fn test_identify_marks_user_online() {
        // テスト項目: 識別すると接続とユーザーが関連付き、ユーザーがオンラインになる
        // given (前提条件):
        let users = Arc::new(InMemoryUserDirectory::default());
        let session = SessionComponents::default();
        session.registry.lock().await.on_connect(conn("c1"));
        let usecase =
            IdentifyUserUseCase::new(users.clone(), session.clone(), Arc::new(FixedClock::new(42)));

        // when (操作):
        usecase
            .execute(&conn("c1"), user("alice"), Some("Alice".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(
            session.registry.lock().await.lookup_user(&conn("c1")),
            Some(user("alice"))
        );
        let record = users.get_user(&user("alice")).await.unwrap();
        assert!(record.online);
        assert_eq!(record.username.as_deref(), Some("Alice"));
        assert_eq!(record.last_seen, Timestamp::new(42));
    }

    #[tokio::test]
    async fn test_identify_survives_directory_failure() {
        // テスト項目: ディレクトリの更新に失敗しても接続とユーザーの関連付けは行われる
        // given (前提条件):
        let mut users = MockUserDirectory::new();
        users
            .expect_set_online()
            .times(1)
            .returning(|_, _, _, _| Err(DirectoryError::Unavailable("down".to_string())));
        let session = SessionComponents::default();
        session.registry.lock().await.on_connect(conn("c1"));
        let usecase =
            IdentifyUserUseCase::new(Arc::new(users), session.clone(), Arc::new(FixedClock::new(0)));

        // when (操作):
        usecase.execute(&conn("c1"), user("alice"), None).await;

        // then (期待する結果):
        assert_eq!(
            session
                .registry
                .lock()
                .await
                .lookup_connection_for_user(&user("alice")),
            Some(conn("c1"))
        );
    }
}
