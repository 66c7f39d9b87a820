//! TransactionalRepository trait implementation for SQLite
//!
//! Thin adapter from the trait surface to the repository functions,
//! converting backend errors into the unified `DataError`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{
    FriendRequestRow, FriendRequestStatus, PermissionLevel, PermissionRow, PlaylistItemRow,
    PlaylistRow, UserRow,
};

use super::SqliteService;
use super::repositories::{friend, permission, playlist, user};

#[async_trait]
impl TransactionalRepository for Arc<SqliteService> {
    // ==================== User Operations ====================

    async fn create_user(
        &self,
        id: &str,
        email: &str,
        display_name: &str,
    ) -> Result<UserRow, DataError> {
        user::create_user(self.pool(), id, email, display_name)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::get_user(self.pool(), id).await.map_err(Into::into)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError> {
        user::get_by_email(self.pool(), email)
            .await
            .map_err(Into::into)
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<UserRow>, DataError> {
        user::get_users_by_ids(self.pool(), ids)
            .await
            .map_err(Into::into)
    }

    async fn search_users(
        &self,
        query: &str,
        exclude_user_id: &str,
    ) -> Result<Vec<UserRow>, DataError> {
        user::search_users(self.pool(), query, exclude_user_id)
            .await
            .map_err(Into::into)
    }

    async fn add_friend_pair(&self, user_a: &str, user_b: &str) -> Result<(), DataError> {
        user::add_friend_pair(self.pool(), user_a, user_b)
            .await
            .map_err(Into::into)
    }

    async fn remove_friend_pair(&self, user_a: &str, user_b: &str) -> Result<(), DataError> {
        user::remove_friend_pair(self.pool(), user_a, user_b)
            .await
            .map_err(Into::into)
    }

    // ==================== Playlist Operations ====================

    async fn create_playlist(
        &self,
        owner_id: &str,
        title: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> Result<PlaylistRow, DataError> {
        playlist::create_playlist(self.pool(), owner_id, title, description, is_public)
            .await
            .map_err(Into::into)
    }

    async fn get_playlist(&self, id: &str) -> Result<Option<PlaylistRow>, DataError> {
        playlist::get_playlist(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_owned_playlists(&self, owner_id: &str) -> Result<Vec<PlaylistRow>, DataError> {
        playlist::list_owned(self.pool(), owner_id)
            .await
            .map_err(Into::into)
    }

    async fn list_shared_playlists(&self, user_id: &str) -> Result<Vec<PlaylistRow>, DataError> {
        playlist::list_shared_with(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn update_playlist_items(
        &self,
        id: &str,
        items: &[PlaylistItemRow],
    ) -> Result<bool, DataError> {
        playlist::update_items(self.pool(), id, items)
            .await
            .map_err(Into::into)
    }

    async fn delete_playlist(&self, id: &str) -> Result<bool, DataError> {
        playlist::delete_playlist(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Permission Operations ====================

    async fn create_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
        level: PermissionLevel,
        granted_by: &str,
    ) -> Result<PermissionRow, DataError> {
        permission::create_permission(self.pool(), playlist_id, user_id, level, granted_by)
            .await
            .map_err(Into::into)
    }

    async fn get_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Option<PermissionRow>, DataError> {
        permission::get_permission(self.pool(), playlist_id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_permissions(&self, playlist_id: &str) -> Result<Vec<PermissionRow>, DataError> {
        permission::list_for_playlist(self.pool(), playlist_id)
            .await
            .map_err(Into::into)
    }

    async fn delete_permission(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<bool, DataError> {
        permission::delete_permission(self.pool(), playlist_id, user_id)
            .await
            .map_err(Into::into)
    }

    async fn delete_permissions_for_playlist(&self, playlist_id: &str) -> Result<u64, DataError> {
        permission::delete_for_playlist(self.pool(), playlist_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Friend Request Operations ====================

    async fn create_friend_request(
        &self,
        from_user_id: &str,
        to_user_id: &str,
    ) -> Result<FriendRequestRow, DataError> {
        friend::create_request(self.pool(), from_user_id, to_user_id)
            .await
            .map_err(Into::into)
    }

    async fn get_friend_request(&self, id: &str) -> Result<Option<FriendRequestRow>, DataError> {
        friend::get_request(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn find_pending_request_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<FriendRequestRow>, DataError> {
        friend::find_pending_between(self.pool(), user_a, user_b)
            .await
            .map_err(Into::into)
    }

    async fn list_pending_requests_from(
        &self,
        user_id: &str,
    ) -> Result<Vec<FriendRequestRow>, DataError> {
        friend::list_pending_from(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_pending_requests_to(
        &self,
        user_id: &str,
    ) -> Result<Vec<FriendRequestRow>, DataError> {
        friend::list_pending_to(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn update_friend_request_status(
        &self,
        id: &str,
        status: FriendRequestStatus,
        responded_at: i64,
    ) -> Result<bool, DataError> {
        friend::update_status(self.pool(), id, status, responded_at)
            .await
            .map_err(Into::into)
    }
}
