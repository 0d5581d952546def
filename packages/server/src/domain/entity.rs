//! Entities owned by the room/user directory.

use serde::{Deserialize, Serialize};

use super::value_object::{RoomId, Theme, Timestamp, UserId};

/// Persisted room record.
///
/// Invariant: whenever `participants` is non-empty, `host` is one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: RoomId,
    pub name: String,
    pub creator: Option<UserId>,
    pub is_public: bool,
    pub host: Option<UserId>,
    pub participants: Vec<UserId>,
    pub theme: Option<Theme>,
    pub created_at: Timestamp,
}

/// Result of removing a participant from a room record
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRemoval {
    /// The record after the removal
    pub room: RoomRecord,
    /// Set when the departing participant was host and someone else took over
    pub new_host: Option<UserId>,
}

impl RoomRecord {
    pub fn new(id: RoomId, name: String, creator: Option<UserId>, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            creator,
            is_public: true,
            host: None,
            participants: Vec::new(),
            theme: None,
            created_at,
        }
    }

    /// Add a participant with set semantics.
    ///
    /// Returns `false` if the user was already a participant. A room without a
    /// valid host hands the role to the joining user.
    pub fn add_participant(&mut self, user_id: UserId) -> bool {
        let inserted = if self.is_participant(&user_id) {
            false
        } else {
            self.participants.push(user_id.clone());
            true
        };

        if !self.host_is_valid() {
            self.host = Some(user_id);
        }

        inserted
    }

    /// Remove a participant, reassigning the host to the first remaining
    /// participant when the host leaves.
    pub fn remove_participant(&mut self, user_id: &UserId) -> Option<UserId> {
        self.participants.retain(|p| p != user_id);

        if self.participants.is_empty() {
            self.host = None;
            return None;
        }

        if self.host_is_valid() {
            return None;
        }

        let new_host = self.participants[0].clone();
        self.host = Some(new_host.clone());
        Some(new_host)
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    pub fn is_host(&self, user_id: &UserId) -> bool {
        self.host.as_ref() == Some(user_id)
    }

    fn host_is_valid(&self) -> bool {
        self.host
            .as_ref()
            .is_some_and(|host| self.is_participant(host))
    }
}

/// Persisted presence fields of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: Option<String>,
    pub online: bool,
    pub current_room: Option<RoomId>,
    pub last_seen: Timestamp,
}

impl UserRecord {
    pub fn new(id: UserId, username: Option<String>, last_seen: Timestamp) -> Self {
        Self {
            id,
            username,
            online: false,
            current_room: None,
            last_seen,
        }
    }
}
