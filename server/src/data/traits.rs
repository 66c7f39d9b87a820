//! Repository traits for database backends
//!
//! A unified interface over the transactional store. The SQLite backend
//! implements it for production; the in-memory backend implements it for
//! tests and ephemeral deployments.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    FriendRequestRow, FriendRequestStatus, PermissionLevel, PermissionRow, PlaylistItemRow,
    PlaylistRow, UserRow,
};

/// Repository trait for transactional operations (users, playlists,
/// permissions, friend requests).
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    // ==================== User Operations ====================

    /// Create a user with a caller-supplied id
    async fn create_user(
        &self,
        id: &str,
        email: &str,
        display_name: &str,
    ) -> Result<UserRow, DataError>;

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError>;

    /// Fetch users by id; missing ids are silently absent from the result
    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserRow>, DataError>;

    /// Case-insensitive substring search on display name or email
    async fn search_users(
        &self,
        query: &str,
        exclude_user_id: &str,
    ) -> Result<Vec<UserRow>, DataError>;

    /// Add each user to the other's friend set (idempotent)
    async fn add_friend_pair(&self, user_a: &str, user_b: &str) -> Result<(), DataError>;

    /// Remove each user from the other's friend set
    async fn remove_friend_pair(&self, user_a: &str, user_b: &str) -> Result<(), DataError>;

    // ==================== Playlist Operations ====================

    async fn create_playlist(
        &self,
        owner_id: &str,
        title: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> Result<PlaylistRow, DataError>;

    async fn get_playlist(&self, id: &str) -> Result<Option<PlaylistRow>, DataError>;

    async fn list_owned_playlists(&self, owner_id: &str) -> Result<Vec<PlaylistRow>, DataError>;

    /// Playlists the user holds a permission on
    async fn list_shared_playlists(&self, user_id: &str) -> Result<Vec<PlaylistRow>, DataError>;

    /// Replace the item list wholesale and bump `updated_at`
    async fn update_playlist_items(
        &self,
        id: &str,
        items: &[PlaylistItemRow],
    ) -> Result<bool, DataError>;

    async fn delete_playlist(&self, id: &str) -> Result<bool, DataError>;

    // ==================== Permission Operations ====================

    async fn create_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
        level: PermissionLevel,
        granted_by: &str,
    ) -> Result<PermissionRow, DataError>;

    async fn get_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Option<PermissionRow>, DataError>;

    async fn list_permissions(&self, playlist_id: &str) -> Result<Vec<PermissionRow>, DataError>;

    async fn delete_permission(&self, playlist_id: &str, user_id: &str)
    -> Result<bool, DataError>;

    async fn delete_permissions_for_playlist(&self, playlist_id: &str) -> Result<u64, DataError>;

    // ==================== Friend Request Operations ====================

    async fn create_friend_request(
        &self,
        from_user_id: &str,
        to_user_id: &str,
    ) -> Result<FriendRequestRow, DataError>;

    async fn get_friend_request(&self, id: &str) -> Result<Option<FriendRequestRow>, DataError>;

    /// Pending request between two users, in either direction
    async fn find_pending_request_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<FriendRequestRow>, DataError>;

    async fn list_pending_requests_from(
        &self,
        user_id: &str,
    ) -> Result<Vec<FriendRequestRow>, DataError>;

    async fn list_pending_requests_to(
        &self,
        user_id: &str,
    ) -> Result<Vec<FriendRequestRow>, DataError>;

    async fn update_friend_request_status(
        &self,
        id: &str,
        status: FriendRequestStatus,
        responded_at: i64,
    ) -> Result<bool, DataError>;
}
