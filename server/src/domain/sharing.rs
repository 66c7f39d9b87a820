//! Playlist sharing
//!
//! Grants, lists, and revokes per-user permissions on a playlist.
//! Granting requires admin-level access; the owner never holds a
//! permission record of their own.

use std::sync::Arc;

use crate::data::TransactionalService;
use crate::data::types::{PermissionLevel, PermissionRow, PlaylistRow, UserRow};
use crate::domain::access;
use crate::domain::error::DomainError;

pub struct SharingService {
    database: Arc<TransactionalService>,
}

impl SharingService {
    pub fn new(database: Arc<TransactionalService>) -> Self {
        Self { database }
    }

    /// Grant `target_user_id` a permission level on the playlist
    pub async fn share_playlist(
        &self,
        user_id: &str,
        playlist_id: &str,
        target_user_id: &str,
        level: PermissionLevel,
    ) -> Result<PermissionRow, DomainError> {
        let playlist = self.load_managed(user_id, playlist_id).await?;

        if target_user_id == playlist.owner_id {
            return Err(DomainError::validation(
                "The owner already has full access",
            ));
        }

        let repo = self.database.repository();
        if repo.get_user(target_user_id).await?.is_none() {
            return Err(DomainError::not_found("Target user not found"));
        }
        if repo.get_permission(playlist_id, target_user_id).await?.is_some() {
            return Err(DomainError::conflict(
                "User already has a permission on this playlist",
            ));
        }

        let permission = repo
            .create_permission(playlist_id, target_user_id, level, user_id)
            .await?;

        tracing::debug!(
            playlist_id = %playlist_id,
            target_user_id = %target_user_id,
            level = %level,
            "Playlist shared"
        );
        Ok(permission)
    }

    /// Revoke a user's permission. Succeeds even when no permission
    /// exists, so revocation is idempotent.
    pub async fn revoke_permission(
        &self,
        user_id: &str,
        playlist_id: &str,
        target_user_id: &str,
    ) -> Result<(), DomainError> {
        self.load_managed(user_id, playlist_id).await?;

        self.database
            .repository()
            .delete_permission(playlist_id, target_user_id)
            .await?;
        Ok(())
    }

    /// All permissions on a playlist, with grantee display names
    pub async fn list_permissions(
        &self,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<Vec<(PermissionRow, Option<UserRow>)>, DomainError> {
        let repo = self.database.repository();
        let playlist = repo
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Playlist not found"))?;
        let permission = repo.get_permission(playlist_id, user_id).await?;

        if !access::can_view(user_id, &playlist, permission.as_ref()) {
            return Err(DomainError::forbidden(
                "You do not have access to this playlist",
            ));
        }

        let permissions = repo.list_permissions(playlist_id).await?;
        let user_ids: Vec<String> = permissions.iter().map(|p| p.user_id.clone()).collect();
        let users = repo.get_users_by_ids(&user_ids).await?;

        Ok(permissions
            .into_iter()
            .map(|p| {
                let user = users.iter().find(|u| u.id == p.user_id).cloned();
                (p, user)
            })
            .collect())
    }

    async fn load_managed(
        &self,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<PlaylistRow, DomainError> {
        let repo = self.database.repository();
        let playlist = repo
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Playlist not found"))?;
        let permission = repo.get_permission(playlist_id, user_id).await?;

        if !access::can_manage_permissions(user_id, &playlist, permission.as_ref()) {
            return Err(DomainError::forbidden(
                "Only the owner or an admin can manage sharing",
            ));
        }
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TransactionalBackend;

    async fn make_service() -> (SharingService, Arc<TransactionalService>, String) {
        let database = Arc::new(
            TransactionalService::init(TransactionalBackend::Memory, std::path::Path::new(""))
                .await
                .unwrap(),
        );
        let repo = database.repository();
        repo.create_user("owner", "owner@example.com", "Owner")
            .await
            .unwrap();
        repo.create_user("friend", "friend@example.com", "Friend")
            .await
            .unwrap();
        repo.create_user("admin", "admin@example.com", "Admin")
            .await
            .unwrap();
        let playlist = repo
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        (SharingService::new(database.clone()), database, playlist.id)
    }

    #[tokio::test]
    async fn test_share_creates_permission() {
        let (service, _db, playlist_id) = make_service().await;
        let permission = service
            .share_playlist("owner", &playlist_id, "friend", PermissionLevel::View)
            .await
            .unwrap();
        assert_eq!(permission.user_id, "friend");
        assert_eq!(permission.level, PermissionLevel::View);
        assert_eq!(permission.granted_by, "owner");
    }

    #[tokio::test]
    async fn test_share_with_owner_rejected() {
        let (service, _db, playlist_id) = make_service().await;
        let err = service
            .share_playlist("owner", &playlist_id, "owner", PermissionLevel::View)
            .await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_share_unknown_target_not_found() {
        let (service, _db, playlist_id) = make_service().await;
        let err = service
            .share_playlist("owner", &playlist_id, "ghost", PermissionLevel::View)
            .await;
        assert!(matches!(err, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_share_twice_conflicts() {
        let (service, _db, playlist_id) = make_service().await;
        service
            .share_playlist("owner", &playlist_id, "friend", PermissionLevel::View)
            .await
            .unwrap();
        let err = service
            .share_playlist("owner", &playlist_id, "friend", PermissionLevel::Edit)
            .await;
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_share() {
        let (service, _db, playlist_id) = make_service().await;
        service
            .share_playlist("owner", &playlist_id, "friend", PermissionLevel::Edit)
            .await
            .unwrap();
        let err = service
            .share_playlist("friend", &playlist_id, "admin", PermissionLevel::View)
            .await;
        assert!(matches!(err, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_grantee_can_share() {
        let (service, _db, playlist_id) = make_service().await;
        service
            .share_playlist("owner", &playlist_id, "admin", PermissionLevel::Admin)
            .await
            .unwrap();
        let permission = service
            .share_playlist("admin", &playlist_id, "friend", PermissionLevel::View)
            .await
            .unwrap();
        assert_eq!(permission.granted_by, "admin");
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (service, _db, playlist_id) = make_service().await;
        service
            .share_playlist("owner", &playlist_id, "friend", PermissionLevel::View)
            .await
            .unwrap();
        service
            .revoke_permission("owner", &playlist_id, "friend")
            .await
            .unwrap();
        // No permission left, still succeeds
        service
            .revoke_permission("owner", &playlist_id, "friend")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_permissions_includes_names() {
        let (service, _db, playlist_id) = make_service().await;
        service
            .share_playlist("owner", &playlist_id, "friend", PermissionLevel::View)
            .await
            .unwrap();

        let listed = service.list_permissions("owner", &playlist_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        let (permission, user) = &listed[0];
        assert_eq!(permission.user_id, "friend");
        assert_eq!(user.as_ref().map(|u| u.display_name.as_str()), Some("Friend"));
    }

    #[tokio::test]
    async fn test_grantee_can_list_permissions() {
        let (service, _db, playlist_id) = make_service().await;
        service
            .share_playlist("owner", &playlist_id, "friend", PermissionLevel::View)
            .await
            .unwrap();
        assert!(service.list_permissions("friend", &playlist_id).await.is_ok());

        let err = service.list_permissions("admin", &playlist_id).await;
        assert!(matches!(err, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_permissions_missing_playlist() {
        let (service, _db, _playlist_id) = make_service().await;
        let err = service.list_permissions("owner", "ghost").await;
        assert!(matches!(err, Err(DomainError::NotFound(_))));
    }
}
