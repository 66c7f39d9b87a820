//! Friend request repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{FriendRequestRow, FriendRequestStatus};

type RequestTuple = (String, String, String, String, i64, Option<i64>);

const SELECT_REQUEST: &str =
    "SELECT id, from_user_id, to_user_id, status, created_at, responded_at FROM friend_requests";

fn row_to_request(row: RequestTuple) -> Result<FriendRequestRow, SqliteError> {
    let (id, from_user_id, to_user_id, status, created_at, responded_at) = row;
    let status =
        FriendRequestStatus::parse(&status).ok_or_else(|| SqliteError::CorruptRecord {
            table: "friend_requests",
            error: format!("unknown status: {}", status),
        })?;
    Ok(FriendRequestRow {
        id,
        from_user_id,
        to_user_id,
        status,
        created_at,
        responded_at,
    })
}

/// Create a pending friend request
pub async fn create_request(
    pool: &SqlitePool,
    from_user_id: &str,
    to_user_id: &str,
) -> Result<FriendRequestRow, SqliteError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO friend_requests (id, from_user_id, to_user_id, status, created_at) VALUES (?, ?, ?, 'pending', ?)",
    )
    .bind(&id)
    .bind(from_user_id)
    .bind(to_user_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(FriendRequestRow {
        id,
        from_user_id: from_user_id.to_string(),
        to_user_id: to_user_id.to_string(),
        status: FriendRequestStatus::Pending,
        created_at: now,
        responded_at: None,
    })
}

/// Get a friend request by ID
pub async fn get_request(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<FriendRequestRow>, SqliteError> {
    let row = sqlx::query_as::<_, RequestTuple>(&format!("{} WHERE id = ?", SELECT_REQUEST))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(row_to_request).transpose()
}

/// Find a pending request between two users, in either direction
pub async fn find_pending_between(
    pool: &SqlitePool,
    user_a: &str,
    user_b: &str,
) -> Result<Option<FriendRequestRow>, SqliteError> {
    let row = sqlx::query_as::<_, RequestTuple>(&format!(
        "{} WHERE status = 'pending' AND ((from_user_id = ? AND to_user_id = ?) OR (from_user_id = ? AND to_user_id = ?))",
        SELECT_REQUEST
    ))
    .bind(user_a)
    .bind(user_b)
    .bind(user_b)
    .bind(user_a)
    .fetch_optional(pool)
    .await?;

    row.map(row_to_request).transpose()
}

/// List pending requests sent by a user, newest first
pub async fn list_pending_from(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<FriendRequestRow>, SqliteError> {
    let rows = sqlx::query_as::<_, RequestTuple>(&format!(
        "{} WHERE from_user_id = ? AND status = 'pending' ORDER BY created_at DESC",
        SELECT_REQUEST
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_request).collect()
}

/// List pending requests received by a user, newest first
pub async fn list_pending_to(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<FriendRequestRow>, SqliteError> {
    let rows = sqlx::query_as::<_, RequestTuple>(&format!(
        "{} WHERE to_user_id = ? AND status = 'pending' ORDER BY created_at DESC",
        SELECT_REQUEST
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_request).collect()
}

/// Record the response to a request
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: FriendRequestStatus,
    responded_at: i64,
) -> Result<bool, SqliteError> {
    let result = sqlx::query("UPDATE friend_requests SET status = ?, responded_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(responded_at)
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
        user::create_user(&pool, "u1", "u1@example.com", "U1")
            .await
            .unwrap();
        user::create_user(&pool, "u2", "u2@example.com", "U2")
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_request_is_pending() {
        let pool = setup_test_pool().await;
        let request = create_request(&pool, "u1", "u2").await.unwrap();

        assert_eq!(request.status, FriendRequestStatus::Pending);
        assert!(request.responded_at.is_none());

        let fetched = get_request(&pool, &request.id).await.unwrap().unwrap();
        assert_eq!(fetched.from_user_id, "u1");
        assert_eq!(fetched.to_user_id, "u2");
    }

    #[tokio::test]
    async fn test_find_pending_between_both_directions() {
        let pool = setup_test_pool().await;
        create_request(&pool, "u1", "u2").await.unwrap();

        assert!(find_pending_between(&pool, "u1", "u2")
            .await
            .unwrap()
            .is_some());
        assert!(find_pending_between(&pool, "u2", "u1")
            .await
            .unwrap()
            .is_some());
        assert!(find_pending_between(&pool, "u1", "ghost")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_status_clears_pending() {
        let pool = setup_test_pool().await;
        let request = create_request(&pool, "u1", "u2").await.unwrap();

        assert!(
            update_status(&pool, &request.id, FriendRequestStatus::Accepted, 42)
                .await
                .unwrap()
        );

        let fetched = get_request(&pool, &request.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, FriendRequestStatus::Accepted);
        assert_eq!(fetched.responded_at, Some(42));

        assert!(find_pending_between(&pool, "u1", "u2")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_pending_lists() {
        let pool = setup_test_pool().await;
        create_request(&pool, "u1", "u2").await.unwrap();

        assert_eq!(list_pending_from(&pool, "u1").await.unwrap().len(), 1);
        assert!(list_pending_from(&pool, "u2").await.unwrap().is_empty());
        assert_eq!(list_pending_to(&pool, "u2").await.unwrap().len(), 1);
    }
}
