//! Shared data types across storage backends
//!
//! Row types returned by the repository layer. Playlists embed their
//! items and users embed their friend id set, mirroring the document
//! shape the API exposes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Permission Level
// ============================================================================

/// Graded access level for a shared playlist.
///
/// Variants are declared in ascending order so `level >= required`
/// comparisons express minimum-level checks directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    View,
    Edit,
    Admin,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Admin => "admin",
        }
    }

    /// Parse a level from its wire form (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Friend Request Status
// ============================================================================

/// Lifecycle state of a friend request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl FriendRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

impl std::fmt::Display for FriendRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Rows
// ============================================================================

/// User row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// Ids of accepted friends (symmetric: if a lists b, b lists a)
    pub friends: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One entry in a playlist's ordered item list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItemRow {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    pub url: String,
    /// Position key. Dense on append, gaps allowed after removal.
    pub order: i64,
    /// User who added the item; not necessarily the playlist owner.
    pub added_by: String,
    pub added_at: i64,
}

/// Playlist row with embedded items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub items: Vec<PlaylistItemRow>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Permission row: one per (playlist, user) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRow {
    pub id: String,
    pub playlist_id: String,
    pub user_id: String,
    pub level: PermissionLevel,
    pub granted_by: String,
    pub created_at: i64,
}

/// Friend request row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequestRow {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub status: FriendRequestStatus,
    pub created_at: i64,
    pub responded_at: Option<i64>,
}
