//! Playlist repository for SQLite operations
//!
//! Items live in the `items` JSON column and are rewritten wholesale on
//! every mutation; ordering semantics are enforced by the domain layer.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{PlaylistItemRow, PlaylistRow};

type PlaylistTuple = (String, String, String, Option<String>, i64, String, i64, i64);

const SELECT_PLAYLIST: &str = "SELECT id, owner_id, title, description, is_public, items, created_at, updated_at FROM playlists";

fn row_to_playlist(row: PlaylistTuple) -> Result<PlaylistRow, SqliteError> {
    let (id, owner_id, title, description, is_public, items, created_at, updated_at) = row;
    let items: Vec<PlaylistItemRow> =
        serde_json::from_str(&items).map_err(|e| SqliteError::corrupt("playlists", e))?;
    Ok(PlaylistRow {
        id,
        owner_id,
        title,
        description,
        is_public: is_public != 0,
        items,
        created_at,
        updated_at,
    })
}

/// Create a playlist with an empty item list
pub async fn create_playlist(
    pool: &SqlitePool,
    owner_id: &str,
    title: &str,
    description: Option<&str>,
    is_public: bool,
) -> Result<PlaylistRow, SqliteError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO playlists (id, owner_id, title, description, is_public, items, created_at, updated_at) VALUES (?, ?, ?, ?, ?, '[]', ?, ?)",
    )
    .bind(&id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(is_public as i64)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(PlaylistRow {
        id,
        owner_id: owner_id.to_string(),
        title: title.to_string(),
        description: description.map(String::from),
        is_public,
        items: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a playlist by ID
pub async fn get_playlist(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<PlaylistRow>, SqliteError> {
    let row = sqlx::query_as::<_, PlaylistTuple>(&format!("{} WHERE id = ?", SELECT_PLAYLIST))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(row_to_playlist).transpose()
}

/// List playlists owned by a user, newest first
pub async fn list_owned(pool: &SqlitePool, owner_id: &str) -> Result<Vec<PlaylistRow>, SqliteError> {
    let rows = sqlx::query_as::<_, PlaylistTuple>(&format!(
        "{} WHERE owner_id = ? ORDER BY created_at DESC",
        SELECT_PLAYLIST
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_playlist).collect()
}

/// List playlists the user holds a permission on, newest first
pub async fn list_shared_with(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<PlaylistRow>, SqliteError> {
    let rows = sqlx::query_as::<_, PlaylistTuple>(
        "SELECT p.id, p.owner_id, p.title, p.description, p.is_public, p.items, p.created_at, p.updated_at \
         FROM playlists p \
         JOIN permissions perm ON perm.playlist_id = p.id \
         WHERE perm.user_id = ? \
         ORDER BY p.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_playlist).collect()
}

/// Replace the playlist's item list and bump `updated_at`
pub async fn update_items(
    pool: &SqlitePool,
    id: &str,
    items: &[PlaylistItemRow],
) -> Result<bool, SqliteError> {
    let encoded =
        serde_json::to_string(items).map_err(|e| SqliteError::corrupt("playlists", e))?;
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("UPDATE playlists SET items = ?, updated_at = ? WHERE id = ?")
        .bind(encoded)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a playlist by ID
pub async fn delete_playlist(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        user::create_user(&pool, "owner", "owner@example.com", "Owner")
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_playlist_starts_empty() {
        let pool = setup_test_pool().await;
        let playlist = create_playlist(&pool, "owner", "Road Trip", None, false)
            .await
            .unwrap();

        assert!(playlist.items.is_empty());
        assert!(!playlist.is_public);

        let fetched = get_playlist(&pool, &playlist.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Road Trip");
        assert_eq!(fetched.owner_id, "owner");
    }

    #[tokio::test]
    async fn test_update_items_roundtrip() {
        let pool = setup_test_pool().await;
        let playlist = create_playlist(&pool, "owner", "Mix", None, false)
            .await
            .unwrap();

        let items = vec![PlaylistItemRow {
            id: "i1".to_string(),
            title: "Song".to_string(),
            artist: Some("Band".to_string()),
            url: "https://example.com/song".to_string(),
            order: 0,
            added_by: "owner".to_string(),
            added_at: 1,
        }];
        assert!(update_items(&pool, &playlist.id, &items).await.unwrap());

        let fetched = get_playlist(&pool, &playlist.id).await.unwrap().unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].title, "Song");
        assert!(fetched.updated_at >= playlist.updated_at);
    }

    #[tokio::test]
    async fn test_update_items_missing_playlist() {
        let pool = setup_test_pool().await;
        assert!(!update_items(&pool, "ghost", &[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_owned_and_delete() {
        let pool = setup_test_pool().await;
        let playlist = create_playlist(&pool, "owner", "Mix", None, true)
            .await
            .unwrap();

        let owned = list_owned(&pool, "owner").await.unwrap();
        assert_eq!(owned.len(), 1);

        assert!(delete_playlist(&pool, &playlist.id).await.unwrap());
        assert!(!delete_playlist(&pool, &playlist.id).await.unwrap());
        assert!(list_owned(&pool, "owner").await.unwrap().is_empty());
    }
}
