//! In-memory repository backend
//!
//! DashMap-backed implementation of `TransactionalRepository`. Backs the
//! `memory` database backend for ephemeral runs and is the storage used
//! by the domain test suites. Enforces the same uniqueness rules the
//! SQLite schema enforces with constraints.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::data::error::DataError;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{
    FriendRequestRow, FriendRequestStatus, PermissionLevel, PermissionRow, PlaylistItemRow,
    PlaylistRow, UserRow,
};

/// In-memory transactional store
#[derive(Default)]
pub struct MemoryService {
    users: DashMap<String, UserRow>,
    playlists: DashMap<String, PlaylistRow>,
    /// Keyed by (playlist_id, user_id)
    permissions: DashMap<(String, String), PermissionRow>,
    friend_requests: DashMap<String, FriendRequestRow>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl TransactionalRepository for Arc<MemoryService> {
    // ==================== User Operations ====================

    async fn create_user(
        &self,
        id: &str,
        email: &str,
        display_name: &str,
    ) -> Result<UserRow, DataError> {
        if self.users.contains_key(id) {
            return Err(DataError::Conflict(format!("user {} already exists", id)));
        }
        if self.users.iter().any(|u| u.email == email) {
            return Err(DataError::Conflict(format!("email {} already in use", email)));
        }

        let ts = now();
        let user = UserRow {
            id: id.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            friends: Vec::new(),
            created_at: ts,
            updated_at: ts,
        };
        self.users.insert(id.to_string(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserRow>, DataError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn search_users(
        &self,
        query: &str,
        exclude_user_id: &str,
    ) -> Result<Vec<UserRow>, DataError> {
        let needle = query.to_lowercase();
        let mut results: Vec<UserRow> = self
            .users
            .iter()
            .filter(|u| {
                u.id != exclude_user_id
                    && (u.display_name.to_lowercase().contains(&needle)
                        || u.email.to_lowercase().contains(&needle))
            })
            .map(|u| u.clone())
            .collect();
        results.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(results)
    }

    async fn add_friend_pair(&self, user_a: &str, user_b: &str) -> Result<(), DataError> {
        if !self.users.contains_key(user_a) || !self.users.contains_key(user_b) {
            return Ok(());
        }
        let ts = now();
        if let Some(mut a) = self.users.get_mut(user_a)
            && !a.friends.iter().any(|f| f == user_b)
        {
            a.friends.push(user_b.to_string());
            a.updated_at = ts;
        }
        if let Some(mut b) = self.users.get_mut(user_b)
            && !b.friends.iter().any(|f| f == user_a)
        {
            b.friends.push(user_a.to_string());
            b.updated_at = ts;
        }
        Ok(())
    }

    async fn remove_friend_pair(&self, user_a: &str, user_b: &str) -> Result<(), DataError> {
        let ts = now();
        if let Some(mut a) = self.users.get_mut(user_a) {
            a.friends.retain(|f| f != user_b);
            a.updated_at = ts;
        }
        if let Some(mut b) = self.users.get_mut(user_b) {
            b.friends.retain(|f| f != user_a);
            b.updated_at = ts;
        }
        Ok(())
    }

    // ==================== Playlist Operations ====================

    async fn create_playlist(
        &self,
        owner_id: &str,
        title: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> Result<PlaylistRow, DataError> {
        let ts = now();
        let playlist = PlaylistRow {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: description.map(String::from),
            is_public,
            items: Vec::new(),
            created_at: ts,
            updated_at: ts,
        };
        self.playlists
            .insert(playlist.id.clone(), playlist.clone());
        Ok(playlist)
    }

    async fn get_playlist(&self, id: &str) -> Result<Option<PlaylistRow>, DataError> {
        Ok(self.playlists.get(id).map(|p| p.clone()))
    }

    async fn list_owned_playlists(&self, owner_id: &str) -> Result<Vec<PlaylistRow>, DataError> {
        let mut results: Vec<PlaylistRow> = self
            .playlists
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| p.clone())
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    async fn list_shared_playlists(&self, user_id: &str) -> Result<Vec<PlaylistRow>, DataError> {
        let mut results: Vec<PlaylistRow> = self
            .permissions
            .iter()
            .filter(|entry| entry.key().1 == user_id)
            .filter_map(|entry| self.playlists.get(&entry.key().0).map(|p| p.clone()))
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    async fn update_playlist_items(
        &self,
        id: &str,
        items: &[PlaylistItemRow],
    ) -> Result<bool, DataError> {
        match self.playlists.get_mut(id) {
            Some(mut playlist) => {
                playlist.items = items.to_vec();
                playlist.updated_at = now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_playlist(&self, id: &str) -> Result<bool, DataError> {
        Ok(self.playlists.remove(id).is_some())
    }

    // ==================== Permission Operations ====================

    async fn create_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
        level: PermissionLevel,
        granted_by: &str,
    ) -> Result<PermissionRow, DataError> {
        let key = (playlist_id.to_string(), user_id.to_string());
        if self.permissions.contains_key(&key) {
            return Err(DataError::Conflict(format!(
                "permission already exists for user {} on playlist {}",
                user_id, playlist_id
            )));
        }

        let permission = PermissionRow {
            id: uuid::Uuid::new_v4().to_string(),
            playlist_id: playlist_id.to_string(),
            user_id: user_id.to_string(),
            level,
            granted_by: granted_by.to_string(),
            created_at: now(),
        };
        self.permissions.insert(key, permission.clone());
        Ok(permission)
    }

    async fn get_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Option<PermissionRow>, DataError> {
        let key = (playlist_id.to_string(), user_id.to_string());
        Ok(self.permissions.get(&key).map(|p| p.clone()))
    }

    async fn list_permissions(&self, playlist_id: &str) -> Result<Vec<PermissionRow>, DataError> {
        let mut results: Vec<PermissionRow> = self
            .permissions
            .iter()
            .filter(|entry| entry.key().0 == playlist_id)
            .map(|entry| entry.value().clone())
            .collect();
        results.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(results)
    }

    async fn delete_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<bool, DataError> {
        let key = (playlist_id.to_string(), user_id.to_string());
        Ok(self.permissions.remove(&key).is_some())
    }

    async fn delete_permissions_for_playlist(&self, playlist_id: &str) -> Result<u64, DataError> {
        let keys: Vec<(String, String)> = self
            .permissions
            .iter()
            .filter(|entry| entry.key().0 == playlist_id)
            .map(|entry| entry.key().clone())
            .collect();
        let count = keys.len() as u64;
        for key in keys {
            self.permissions.remove(&key);
        }
        Ok(count)
    }

    // ==================== Friend Request Operations ====================

    async fn create_friend_request(
        &self,
        from_user_id: &str,
        to_user_id: &str,
    ) -> Result<FriendRequestRow, DataError> {
        let request = FriendRequestRow {
            id: uuid::Uuid::new_v4().to_string(),
            from_user_id: from_user_id.to_string(),
            to_user_id: to_user_id.to_string(),
            status: FriendRequestStatus::Pending,
            created_at: now(),
            responded_at: None,
        };
        self.friend_requests
            .insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn get_friend_request(&self, id: &str) -> Result<Option<FriendRequestRow>, DataError> {
        Ok(self.friend_requests.get(id).map(|r| r.clone()))
    }

    async fn find_pending_request_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<FriendRequestRow>, DataError> {
        Ok(self
            .friend_requests
            .iter()
            .find(|r| {
                r.status == FriendRequestStatus::Pending
                    && ((r.from_user_id == user_a && r.to_user_id == user_b)
                        || (r.from_user_id == user_b && r.to_user_id == user_a))
            })
            .map(|r| r.clone()))
    }

    async fn list_pending_requests_from(
        &self,
        user_id: &str,
    ) -> Result<Vec<FriendRequestRow>, DataError> {
        let mut results: Vec<FriendRequestRow> = self
            .friend_requests
            .iter()
            .filter(|r| r.from_user_id == user_id && r.status == FriendRequestStatus::Pending)
            .map(|r| r.clone())
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    async fn list_pending_requests_to(
        &self,
        user_id: &str,
    ) -> Result<Vec<FriendRequestRow>, DataError> {
        let mut results: Vec<FriendRequestRow> = self
            .friend_requests
            .iter()
            .filter(|r| r.to_user_id == user_id && r.status == FriendRequestStatus::Pending)
            .map(|r| r.clone())
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    async fn update_friend_request_status(
        &self,
        id: &str,
        status: FriendRequestStatus,
        responded_at: i64,
    ) -> Result<bool, DataError> {
        match self.friend_requests.get_mut(id) {
            Some(mut request) => {
                request.status = status;
                request.responded_at = Some(responded_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_repo() -> Arc<MemoryService> {
        Arc::new(MemoryService::new())
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let repo = make_repo();
        repo.create_user("u1", "ana@example.com", "Ana")
            .await
            .unwrap();

        let err = repo.create_user("u2", "ana@example.com", "Other").await;
        assert!(matches!(err, Err(DataError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_permission_pair_uniqueness() {
        let repo = make_repo();
        repo.create_permission("pl1", "u1", PermissionLevel::View, "owner")
            .await
            .unwrap();

        let err = repo
            .create_permission("pl1", "u1", PermissionLevel::Admin, "owner")
            .await;
        assert!(matches!(err, Err(DataError::Conflict(_))));

        // Same user on a different playlist is fine
        repo.create_permission("pl2", "u1", PermissionLevel::View, "owner")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_shared_playlists_follows_permissions() {
        let repo = make_repo();
        repo.create_user("owner", "o@example.com", "Owner")
            .await
            .unwrap();
        let playlist = repo
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        repo.create_permission(&playlist.id, "u1", PermissionLevel::View, "owner")
            .await
            .unwrap();

        let shared = repo.list_shared_playlists("u1").await.unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].id, playlist.id);

        assert!(repo.list_shared_playlists("u2").await.unwrap().is_empty());
    }
}
