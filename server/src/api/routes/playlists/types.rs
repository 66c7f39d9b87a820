//! Playlists API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{PermissionLevel, PermissionRow, PlaylistItemRow, PlaylistRow, UserRow};
use crate::domain::playlists::PlaylistOverview;

/// Request body for creating a playlist
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_public: bool,
}

/// Request body for adding a playlist item
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 200, message = "Artist must be at most 200 characters"))]
    pub artist: Option<String>,

    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// Request body for reordering playlist items
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReorderItemsRequest {
    /// Every current item id, in the desired order
    #[validate(length(min = 1, message = "item_order cannot be empty"))]
    pub item_order: Vec<String>,
}

/// Request body for sharing a playlist
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SharePlaylistRequest {
    #[validate(length(min = 1, max = 256, message = "user_id must be 1-256 characters"))]
    pub user_id: String,

    /// Access level: view, edit or admin (case-insensitive)
    #[schema(example = "edit")]
    pub level: String,
}

/// A playlist item
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistItemResponse {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    pub url: String,
    pub order: i64,
    pub added_by: String,
    pub added_at: DateTime<Utc>,
}

impl From<PlaylistItemRow> for PlaylistItemResponse {
    fn from(row: PlaylistItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            artist: row.artist,
            url: row.url,
            order: row.order,
            added_by: row.added_by,
            added_at: DateTime::from_timestamp(row.added_at, 0).unwrap_or_default(),
        }
    }
}

/// A playlist with its items
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub items: Vec<PlaylistItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlaylistRow> for PlaylistResponse {
    fn from(row: PlaylistRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            is_public: row.is_public,
            items: row.items.into_iter().map(Into::into).collect(),
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_default(),
        }
    }
}

/// Response for listing playlists
#[derive(Debug, Serialize, ToSchema)]
pub struct ListPlaylistsResponse {
    pub owned: Vec<PlaylistResponse>,
    pub shared: Vec<PlaylistResponse>,
}

impl From<PlaylistOverview> for ListPlaylistsResponse {
    fn from(overview: PlaylistOverview) -> Self {
        Self {
            owned: overview.owned.into_iter().map(Into::into).collect(),
            shared: overview.shared.into_iter().map(Into::into).collect(),
        }
    }
}

/// A granted permission
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionResponse {
    pub id: String,
    pub playlist_id: String,
    pub user_id: String,
    /// Grantee display name, absent when the account was deleted
    pub user_display_name: Option<String>,
    pub level: PermissionLevel,
    pub granted_by: String,
    pub created_at: DateTime<Utc>,
}

impl PermissionResponse {
    pub fn from_row(row: PermissionRow, user: Option<UserRow>) -> Self {
        Self {
            id: row.id,
            playlist_id: row.playlist_id,
            user_id: row.user_id,
            user_display_name: user.map(|u| u.display_name),
            level: row.level,
            granted_by: row.granted_by,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
        }
    }
}

/// Response for listing permissions
#[derive(Debug, Serialize, ToSchema)]
pub struct ListPermissionsResponse {
    pub permissions: Vec<PermissionResponse>,
}
