//! Permission repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{PermissionLevel, PermissionRow};

type PermissionTuple = (String, String, String, String, String, i64);

const SELECT_PERMISSION: &str =
    "SELECT id, playlist_id, user_id, level, granted_by, created_at FROM permissions";

fn row_to_permission(row: PermissionTuple) -> Result<PermissionRow, SqliteError> {
    let (id, playlist_id, user_id, level, granted_by, created_at) = row;
    // The CHECK constraint keeps level well-formed; an unknown value means
    // the database was edited out-of-band.
    let level = PermissionLevel::parse(&level).ok_or_else(|| SqliteError::CorruptRecord {
        table: "permissions",
        error: format!("unknown level: {}", level),
    })?;
    Ok(PermissionRow {
        id,
        playlist_id,
        user_id,
        level,
        granted_by,
        created_at,
    })
}

/// Grant a permission. The UNIQUE(playlist_id, user_id) constraint catches
/// duplicate grants that race past the domain pre-check; the violation is
/// mapped to `Conflict` rather than a generic database error.
pub async fn create_permission(
    pool: &SqlitePool,
    playlist_id: &str,
    user_id: &str,
    level: PermissionLevel,
    granted_by: &str,
) -> Result<PermissionRow, SqliteError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO permissions (id, playlist_id, user_id, level, granted_by, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(playlist_id)
    .bind(user_id)
    .bind(level.as_str())
    .bind(granted_by)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db) if db.is_unique_violation() => SqliteError::Conflict(format!(
            "permission already exists for user {} on playlist {}",
            user_id, playlist_id
        )),
        _ => SqliteError::Database(e),
    })?;

    Ok(PermissionRow {
        id,
        playlist_id: playlist_id.to_string(),
        user_id: user_id.to_string(),
        level,
        granted_by: granted_by.to_string(),
        created_at: now,
    })
}

/// Get the permission for a (playlist, user) pair
pub async fn get_permission(
    pool: &SqlitePool,
    playlist_id: &str,
    user_id: &str,
) -> Result<Option<PermissionRow>, SqliteError> {
    let row = sqlx::query_as::<_, PermissionTuple>(&format!(
        "{} WHERE playlist_id = ? AND user_id = ?",
        SELECT_PERMISSION
    ))
    .bind(playlist_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(row_to_permission).transpose()
}

/// List all permissions on a playlist
pub async fn list_for_playlist(
    pool: &SqlitePool,
    playlist_id: &str,
) -> Result<Vec<PermissionRow>, SqliteError> {
    let rows = sqlx::query_as::<_, PermissionTuple>(&format!(
        "{} WHERE playlist_id = ? ORDER BY created_at",
        SELECT_PERMISSION
    ))
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_permission).collect()
}

/// Delete the permission for a (playlist, user) pair. Returns whether a
/// row was removed; deleting a missing permission is not an error.
pub async fn delete_permission(
    pool: &SqlitePool,
    playlist_id: &str,
    user_id: &str,
) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM permissions WHERE playlist_id = ? AND user_id = ?")
        .bind(playlist_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete all permissions on a playlist (playlist delete cascade)
pub async fn delete_for_playlist(
    pool: &SqlitePool,
    playlist_id: &str,
) -> Result<u64, SqliteError> {
    let result = sqlx::query("DELETE FROM permissions WHERE playlist_id = ?")
        .bind(playlist_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
