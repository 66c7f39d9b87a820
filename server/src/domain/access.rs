//! Authorization evaluator
//!
//! Pure checks over a playlist and the caller's permission record.
//! Ownership confers admin implicitly; a permission row never exists
//! for the owner. Callers resolve the playlist and permission first,
//! so a missing playlist never reaches these functions.

use crate::data::types::{PermissionLevel, PermissionRow, PlaylistRow};

fn holds_permission(user_id: &str, permission: Option<&PermissionRow>) -> bool {
    permission.is_some_and(|p| p.user_id == user_id)
}

fn has_min_level(
    user_id: &str,
    playlist: &PlaylistRow,
    permission: Option<&PermissionRow>,
    required: PermissionLevel,
) -> bool {
    if playlist.owner_id == user_id {
        return true;
    }
    permission.is_some_and(|p| p.user_id == user_id && p.level >= required)
}

/// Owner, public playlist, or any permission level
pub fn can_view(user_id: &str, playlist: &PlaylistRow, permission: Option<&PermissionRow>) -> bool {
    playlist.owner_id == user_id || playlist.is_public || holds_permission(user_id, permission)
}

/// Owner or permission level >= edit
pub fn can_edit(user_id: &str, playlist: &PlaylistRow, permission: Option<&PermissionRow>) -> bool {
    has_min_level(user_id, playlist, permission, PermissionLevel::Edit)
}

/// Owner or permission level >= admin
pub fn can_manage_permissions(
    user_id: &str,
    playlist: &PlaylistRow,
    permission: Option<&PermissionRow>,
) -> bool {
    has_min_level(user_id, playlist, permission, PermissionLevel::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(owner: &str, is_public: bool) -> PlaylistRow {
        PlaylistRow {
            id: "pl1".to_string(),
            owner_id: owner.to_string(),
            title: "Mix".to_string(),
            description: None,
            is_public,
            items: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn permission(user: &str, level: PermissionLevel) -> PermissionRow {
        PermissionRow {
            id: "perm1".to_string(),
            playlist_id: "pl1".to_string(),
            user_id: user.to_string(),
            level,
            granted_by: "owner".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn test_owner_passes_every_check() {
        let pl = playlist("owner", false);
        assert!(can_view("owner", &pl, None));
        assert!(can_edit("owner", &pl, None));
        assert!(can_manage_permissions("owner", &pl, None));
    }

    #[test]
    fn test_public_playlist_grants_view_only() {
        let pl = playlist("owner", true);
        assert!(can_view("stranger", &pl, None));
        assert!(!can_edit("stranger", &pl, None));
        assert!(!can_manage_permissions("stranger", &pl, None));
    }

    #[test]
    fn test_private_playlist_denies_strangers() {
        let pl = playlist("owner", false);
        assert!(!can_view("stranger", &pl, None));
        assert!(!can_edit("stranger", &pl, None));
    }

    #[test]
    fn test_view_permission_grants_view_only() {
        let pl = playlist("owner", false);
        let perm = permission("u1", PermissionLevel::View);
        assert!(can_view("u1", &pl, Some(&perm)));
        assert!(!can_edit("u1", &pl, Some(&perm)));
        assert!(!can_manage_permissions("u1", &pl, Some(&perm)));
    }

    #[test]
    fn test_edit_permission_grants_view_and_edit() {
        let pl = playlist("owner", false);
        let perm = permission("u1", PermissionLevel::Edit);
        assert!(can_view("u1", &pl, Some(&perm)));
        assert!(can_edit("u1", &pl, Some(&perm)));
        assert!(!can_manage_permissions("u1", &pl, Some(&perm)));
    }

    #[test]
    fn test_admin_permission_grants_everything() {
        let pl = playlist("owner", false);
        let perm = permission("u1", PermissionLevel::Admin);
        assert!(can_view("u1", &pl, Some(&perm)));
        assert!(can_edit("u1", &pl, Some(&perm)));
        assert!(can_manage_permissions("u1", &pl, Some(&perm)));
    }

    #[test]
    fn test_someone_elses_permission_does_not_apply() {
        let pl = playlist("owner", false);
        let perm = permission("u1", PermissionLevel::Admin);
        assert!(!can_view("u2", &pl, Some(&perm)));
        assert!(!can_edit("u2", &pl, Some(&perm)));
        assert!(!can_manage_permissions("u2", &pl, Some(&perm)));
    }
}
