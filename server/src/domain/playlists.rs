//! Playlist catalog and item sequencing
//!
//! Owns the playlist lifecycle and the ordering rules for embedded
//! items: append assigns `order = len`, removal leaves gaps, reorder
//! requires the submitted ids to be exactly the current item set.

use std::collections::HashSet;
use std::sync::Arc;

use crate::data::TransactionalService;
use crate::data::types::{PlaylistItemRow, PlaylistRow};
use crate::domain::access;
use crate::domain::error::DomainError;

/// Owned and shared playlists for one user
pub struct PlaylistOverview {
    pub owned: Vec<PlaylistRow>,
    pub shared: Vec<PlaylistRow>,
}

pub struct PlaylistService {
    database: Arc<TransactionalService>,
}

impl PlaylistService {
    pub fn new(database: Arc<TransactionalService>) -> Self {
        Self { database }
    }

    /// Create a playlist owned by `user_id` with an empty item list
    pub async fn create_playlist(
        &self,
        user_id: &str,
        title: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> Result<PlaylistRow, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Playlist title is required"));
        }

        let playlist = self
            .database
            .repository()
            .create_playlist(user_id, title, description, is_public)
            .await?;

        tracing::debug!(playlist_id = %playlist.id, owner_id = %user_id, "Playlist created");
        Ok(playlist)
    }

    /// Fetch a playlist the caller may view, items sorted by order
    pub async fn get_playlist(
        &self,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<PlaylistRow, DomainError> {
        let mut playlist = self.load_viewable(user_id, playlist_id).await?;
        playlist.items.sort_by_key(|i| i.order);
        Ok(playlist)
    }

    /// Playlists the user owns plus playlists shared with them
    pub async fn list_playlists(&self, user_id: &str) -> Result<PlaylistOverview, DomainError> {
        let repo = self.database.repository();
        let mut owned = repo.list_owned_playlists(user_id).await?;
        let mut shared = repo.list_shared_playlists(user_id).await?;
        for playlist in owned.iter_mut().chain(shared.iter_mut()) {
            playlist.items.sort_by_key(|i| i.order);
        }
        Ok(PlaylistOverview { owned, shared })
    }

    /// Delete a playlist and its permissions. Owner only; admin-level
    /// permission holders cannot delete.
    pub async fn delete_playlist(
        &self,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<(), DomainError> {
        let repo = self.database.repository();
        let playlist = repo
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Playlist not found"))?;

        if playlist.owner_id != user_id {
            return Err(DomainError::forbidden(
                "Only the owner can delete a playlist",
            ));
        }

        // Playlist first, permissions second: if the second step fails the
        // orphaned permissions point at a playlist that no longer resolves.
        repo.delete_playlist(playlist_id).await?;
        let revoked = repo.delete_permissions_for_playlist(playlist_id).await?;

        tracing::debug!(playlist_id = %playlist_id, permissions_revoked = revoked, "Playlist deleted");
        Ok(())
    }

    /// Append an item at the end of the playlist
    pub async fn add_item(
        &self,
        user_id: &str,
        playlist_id: &str,
        title: &str,
        artist: Option<&str>,
        url: &str,
    ) -> Result<PlaylistItemRow, DomainError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Item title is required"));
        }
        if url.trim().is_empty() {
            return Err(DomainError::validation("Item URL is required"));
        }
        if reqwest::Url::parse(url).is_err() {
            return Err(DomainError::validation("Item URL must be absolute"));
        }

        let mut playlist = self.load_editable(user_id, playlist_id).await?;

        let item = PlaylistItemRow {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            artist: artist.map(str::trim).filter(|a| !a.is_empty()).map(String::from),
            url: url.to_string(),
            order: playlist.items.len() as i64,
            added_by: user_id.to_string(),
            added_at: chrono::Utc::now().timestamp(),
        };
        playlist.items.push(item.clone());

        self.database
            .repository()
            .update_playlist_items(playlist_id, &playlist.items)
            .await?;

        Ok(item)
    }

    /// Remove an item. Remaining items keep their order values; gaps are
    /// allowed until the next reorder.
    pub async fn remove_item(
        &self,
        user_id: &str,
        playlist_id: &str,
        item_id: &str,
    ) -> Result<(), DomainError> {
        let mut playlist = self.load_editable(user_id, playlist_id).await?;

        let before = playlist.items.len();
        playlist.items.retain(|i| i.id != item_id);
        if playlist.items.len() == before {
            return Err(DomainError::not_found("Item not found in playlist"));
        }

        self.database
            .repository()
            .update_playlist_items(playlist_id, &playlist.items)
            .await?;

        Ok(())
    }

    /// Reassign item order from the submitted id sequence
    ///
    /// The sequence must be exactly the set of current item ids; position
    /// in the sequence becomes the new order value (0-based).
    pub async fn reorder_items(
        &self,
        user_id: &str,
        playlist_id: &str,
        item_order: &[String],
    ) -> Result<PlaylistRow, DomainError> {
        let mut playlist = self.load_editable(user_id, playlist_id).await?;

        let current: HashSet<&str> = playlist.items.iter().map(|i| i.id.as_str()).collect();
        if item_order.len() != playlist.items.len() {
            return Err(DomainError::validation(
                "Item order must include every playlist item exactly once",
            ));
        }
        let mut seen: HashSet<&str> = HashSet::with_capacity(item_order.len());
        for id in item_order {
            if !current.contains(id.as_str()) {
                return Err(DomainError::validation(format!(
                    "Unknown item id: {}",
                    id
                )));
            }
            if !seen.insert(id.as_str()) {
                return Err(DomainError::validation(format!(
                    "Duplicate item id: {}",
                    id
                )));
            }
        }

        for item in playlist.items.iter_mut() {
            // Membership was checked above, so position always resolves
            if let Some(position) = item_order.iter().position(|id| *id == item.id) {
                item.order = position as i64;
            }
        }
        playlist.items.sort_by_key(|i| i.order);

        self.database
            .repository()
            .update_playlist_items(playlist_id, &playlist.items)
            .await?;

        playlist.updated_at = chrono::Utc::now().timestamp();
        Ok(playlist)
    }

    async fn load_viewable(
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

        if !access::can_view(user_id, &playlist, permission.as_ref()) {
            return Err(DomainError::forbidden(
                "You do not have access to this playlist",
            ));
        }
        Ok(playlist)
    }

    async fn load_editable(
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

        if !access::can_edit(user_id, &playlist, permission.as_ref()) {
            return Err(DomainError::forbidden(
                "You do not have edit access to this playlist",
            ));
        }
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TransactionalBackend;
    use crate::data::types::PermissionLevel;

    async fn make_service() -> (PlaylistService, Arc<TransactionalService>) {
        let database = Arc::new(
            TransactionalService::init(TransactionalBackend::Memory, std::path::Path::new(""))
                .await
                .unwrap(),
        );
        let repo = database.repository();
        repo.create_user("owner", "owner@example.com", "Owner")
            .await
            .unwrap();
        repo.create_user("editor", "editor@example.com", "Editor")
            .await
            .unwrap();
        repo.create_user("viewer", "viewer@example.com", "Viewer")
            .await
            .unwrap();
        (PlaylistService::new(database.clone()), database)
    }

    #[tokio::test]
    async fn test_create_playlist_trims_title() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "  Road Trip  ", None, false)
            .await
            .unwrap();
        assert_eq!(playlist.title, "Road Trip");
        assert!(playlist.items.is_empty());
    }

    #[tokio::test]
    async fn test_create_playlist_rejects_blank_title() {
        let (service, _db) = make_service().await;
        let err = service.create_playlist("owner", "   ", None, false).await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_playlist_not_found() {
        let (service, _db) = make_service().await;
        let err = service.get_playlist("owner", "ghost").await;
        assert!(matches!(err, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_playlist_forbidden_for_stranger() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Private", None, false)
            .await
            .unwrap();
        let err = service.get_playlist("viewer", &playlist.id).await;
        assert!(matches!(err, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_public_playlist_viewable_by_anyone() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Public", None, true)
            .await
            .unwrap();
        assert!(service.get_playlist("viewer", &playlist.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_item_assigns_sequential_order() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();

        let first = service
            .add_item("owner", &playlist.id, "One", None, "https://example.com/1")
            .await
            .unwrap();
        let second = service
            .add_item("owner", &playlist.id, "Two", Some("Band"), "https://example.com/2")
            .await
            .unwrap();

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert_eq!(second.artist.as_deref(), Some("Band"));
        assert_eq!(first.added_by, "owner");
    }

    #[tokio::test]
    async fn test_add_item_rejects_relative_url() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();

        let err = service
            .add_item("owner", &playlist.id, "One", None, "not-a-url")
            .await;
        assert!(matches!(err, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_edit_permission_allows_item_mutation() {
        let (service, db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        db.repository()
            .create_permission(&playlist.id, "editor", PermissionLevel::Edit, "owner")
            .await
            .unwrap();
        db.repository()
            .create_permission(&playlist.id, "viewer", PermissionLevel::View, "owner")
            .await
            .unwrap();

        let item = service
            .add_item("editor", &playlist.id, "One", None, "https://example.com/1")
            .await
            .unwrap();
        // Attribution records the actor, not the playlist owner
        assert_eq!(item.added_by, "editor");

        let err = service
            .add_item("viewer", &playlist.id, "Two", None, "https://example.com/2")
            .await;
        assert!(matches!(err, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_remove_item_keeps_gaps() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        let first = service
            .add_item("owner", &playlist.id, "One", None, "https://example.com/1")
            .await
            .unwrap();
        service
            .add_item("owner", &playlist.id, "Two", None, "https://example.com/2")
            .await
            .unwrap();
        let third = service
            .add_item("owner", &playlist.id, "Three", None, "https://example.com/3")
            .await
            .unwrap();

        service
            .remove_item("owner", &playlist.id, &first.id)
            .await
            .unwrap();

        let fetched = service.get_playlist("owner", &playlist.id).await.unwrap();
        let orders: Vec<i64> = fetched.items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(fetched.items[1].id, third.id);
    }

    #[tokio::test]
    async fn test_remove_unknown_item_not_found() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        let err = service.remove_item("owner", &playlist.id, "ghost").await;
        assert!(matches!(err, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reorder_items_assigns_dense_order() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        let a = service
            .add_item("owner", &playlist.id, "A", None, "https://example.com/a")
            .await
            .unwrap();
        let b = service
            .add_item("owner", &playlist.id, "B", None, "https://example.com/b")
            .await
            .unwrap();
        let c = service
            .add_item("owner", &playlist.id, "C", None, "https://example.com/c")
            .await
            .unwrap();

        let reordered = service
            .reorder_items(
                "owner",
                &playlist.id,
                &[c.id.clone(), a.id.clone(), b.id.clone()],
            )
            .await
            .unwrap();

        let ids: Vec<&str> = reordered.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![c.id.as_str(), a.id.as_str(), b.id.as_str()]);
        let orders: Vec<i64> = reordered.items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_reorder_rejects_wrong_set() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        let a = service
            .add_item("owner", &playlist.id, "A", None, "https://example.com/a")
            .await
            .unwrap();
        let b = service
            .add_item("owner", &playlist.id, "B", None, "https://example.com/b")
            .await
            .unwrap();

        // Missing an id
        let err = service
            .reorder_items("owner", &playlist.id, &[a.id.clone()])
            .await;
        assert!(matches!(err, Err(DomainError::Validation(_))));

        // Unknown id
        let err = service
            .reorder_items("owner", &playlist.id, &[a.id.clone(), "ghost".to_string()])
            .await;
        assert!(matches!(err, Err(DomainError::Validation(_))));

        // Duplicate id
        let err = service
            .reorder_items("owner", &playlist.id, &[a.id.clone(), a.id.clone()])
            .await;
        assert!(matches!(err, Err(DomainError::Validation(_))));

        // Unchanged afterwards
        let fetched = service.get_playlist("owner", &playlist.id).await.unwrap();
        assert_eq!(fetched.items[0].id, a.id);
        assert_eq!(fetched.items[1].id, b.id);
    }

    #[tokio::test]
    async fn test_reorder_after_remove_restores_dense_order() {
        let (service, _db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        let x = service
            .add_item("owner", &playlist.id, "X", None, "https://example.com/x")
            .await
            .unwrap();
        let y = service
            .add_item("owner", &playlist.id, "Y", None, "https://example.com/y")
            .await
            .unwrap();
        let z = service
            .add_item("owner", &playlist.id, "Z", None, "https://example.com/z")
            .await
            .unwrap();

        service.remove_item("owner", &playlist.id, &y.id).await.unwrap();

        let reordered = service
            .reorder_items("owner", &playlist.id, &[z.id.clone(), x.id.clone()])
            .await
            .unwrap();

        let by_order: Vec<(&str, i64)> = reordered
            .items
            .iter()
            .map(|i| (i.id.as_str(), i.order))
            .collect();
        assert_eq!(by_order, vec![(z.id.as_str(), 0), (x.id.as_str(), 1)]);
        assert!(!reordered.items.iter().any(|i| i.id == y.id));
    }

    #[tokio::test]
    async fn test_delete_playlist_owner_only() {
        let (service, db) = make_service().await;
        let playlist = service
            .create_playlist("owner", "Mix", None, false)
            .await
            .unwrap();
        db.repository()
            .create_permission(&playlist.id, "editor", PermissionLevel::Admin, "owner")
            .await
            .unwrap();

        // Even admin-level permission holders cannot delete
        let err = service.delete_playlist("editor", &playlist.id).await;
        assert!(matches!(err, Err(DomainError::Forbidden(_))));

        service.delete_playlist("owner", &playlist.id).await.unwrap();

        // Permissions are gone too
        assert!(db
            .repository()
            .list_permissions(&playlist.id)
            .await
            .unwrap()
            .is_empty());
        let err = service.get_playlist("owner", &playlist.id).await;
        assert!(matches!(err, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_playlists_envelope() {
        let (service, db) = make_service().await;
        service
            .create_playlist("owner", "Mine", None, false)
            .await
            .unwrap();
        let other = service
            .create_playlist("editor", "Theirs", None, false)
            .await
            .unwrap();
        db.repository()
            .create_permission(&other.id, "owner", PermissionLevel::View, "editor")
            .await
            .unwrap();

        let overview = service.list_playlists("owner").await.unwrap();
        assert_eq!(overview.owned.len(), 1);
        assert_eq!(overview.shared.len(), 1);
        assert_eq!(overview.shared[0].id, other.id);
    }
}
