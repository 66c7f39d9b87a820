//! User repository for SQLite operations
//!
//! The friend id set is stored as a JSON array in the `friends` column;
//! friendship updates always touch both rows inside one transaction so
//! the relation stays symmetric.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::UserRow;

type UserTuple = (String, String, String, String, i64, i64);

const SELECT_USER: &str =
    "SELECT id, email, display_name, friends, created_at, updated_at FROM users";

fn row_to_user(row: UserTuple) -> Result<UserRow, SqliteError> {
    let (id, email, display_name, friends, created_at, updated_at) = row;
    let friends: Vec<String> =
        serde_json::from_str(&friends).map_err(|e| SqliteError::corrupt("users", e))?;
    Ok(UserRow {
        id,
        email,
        display_name,
        friends,
        created_at,
        updated_at,
    })
}

/// Create a new user with a caller-supplied id (the identity provider's subject)
pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    email: &str,
    display_name: &str,
) -> Result<UserRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO users (id, email, display_name, friends, created_at, updated_at) VALUES (?, ?, ?, '[]', ?, ?)",
    )
    .bind(id)
    .bind(email)
    .bind(display_name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(UserRow {
        id: id.to_string(),
        email: email.to_string(),
        display_name: display_name.to_string(),
        friends: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!("{} WHERE id = ?", SELECT_USER))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(row_to_user).transpose()
}

/// Get a user by email
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!("{} WHERE email = ?", SELECT_USER))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.map(row_to_user).transpose()
}

/// Fetch the users whose ids appear in `ids`; missing ids are simply absent
pub async fn get_users_by_ids(
    pool: &SqlitePool,
    ids: &[String],
) -> Result<Vec<UserRow>, SqliteError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{} WHERE id IN ({})", SELECT_USER, placeholders);

    let mut query = sqlx::query_as::<_, UserTuple>(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;
    rows.into_iter().map(row_to_user).collect()
}

/// Case-insensitive substring search on display name or email
pub async fn search_users(
    pool: &SqlitePool,
    query: &str,
    exclude_user_id: &str,
) -> Result<Vec<UserRow>, SqliteError> {
    let pattern = format!("%{}%", query.to_lowercase());
    let rows = sqlx::query_as::<_, UserTuple>(&format!(
        "{} WHERE id != ? AND (LOWER(display_name) LIKE ? OR LOWER(email) LIKE ?) ORDER BY display_name",
        SELECT_USER
    ))
    .bind(exclude_user_id)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(row_to_user).collect()
}

async fn write_friends(
    tx: &mut sqlx::SqliteConnection,
    user_id: &str,
    friends: &[String],
    now: i64,
) -> Result<(), SqliteError> {
    let encoded = serde_json::to_string(friends)
        .map_err(|e| SqliteError::corrupt("users", e))?;
    sqlx::query("UPDATE users SET friends = ?, updated_at = ? WHERE id = ?")
        .bind(encoded)
        .bind(now)
        .bind(user_id)
        .execute(tx)
        .await?;
    Ok(())
}

/// Add each user to the other's friend set (idempotent)
pub async fn add_friend_pair(
    pool: &SqlitePool,
    user_a: &str,
    user_b: &str,
) -> Result<(), SqliteError> {
    let a = get_user(pool, user_a).await?;
    let b = get_user(pool, user_b).await?;
    let (Some(a), Some(b)) = (a, b) else {
        return Ok(());
    };

    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    if !a.friends.iter().any(|f| f == user_b) {
        let mut friends = a.friends.clone();
        friends.push(user_b.to_string());
        write_friends(&mut tx, user_a, &friends, now).await?;
    }
    if !b.friends.iter().any(|f| f == user_a) {
        let mut friends = b.friends.clone();
        friends.push(user_a.to_string());
        write_friends(&mut tx, user_b, &friends, now).await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Remove each user from the other's friend set
pub async fn remove_friend_pair(
    pool: &SqlitePool,
    user_a: &str,
    user_b: &str,
) -> Result<(), SqliteError> {
    let a = get_user(pool, user_a).await?;
    let b = get_user(pool, user_b).await?;
    let (Some(a), Some(b)) = (a, b) else {
        return Ok(());
    };

    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let friends_a: Vec<String> = a.friends.into_iter().filter(|f| f != user_b).collect();
    write_friends(&mut tx, user_a, &friends_a, now).await?;

    let friends_b: Vec<String> = b.friends.into_iter().filter(|f| f != user_a).collect();
    write_friends(&mut tx, user_b, &friends_b, now).await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = setup_test_pool().await;
        let user = create_user(&pool, "u1", "ana@example.com", "Ana")
            .await
            .unwrap();

        assert_eq!(user.id, "u1");
        assert!(user.friends.is_empty());

        let fetched = get_user(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(fetched.email, "ana@example.com");
        assert_eq!(fetched.display_name, "Ana");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let pool = setup_test_pool().await;
        create_user(&pool, "u1", "ana@example.com", "Ana")
            .await
            .unwrap();

        let fetched = get_by_email(&pool, "ana@example.com").await.unwrap();
        assert!(fetched.is_some());
        assert!(get_by_email(&pool, "other@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = setup_test_pool().await;
        create_user(&pool, "u1", "ana@example.com", "Ana")
            .await
            .unwrap();

        let err = create_user(&pool, "u2", "ana@example.com", "Other").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_search_users_excludes_caller() {
        let pool = setup_test_pool().await;
        create_user(&pool, "u1", "ana@example.com", "Ana Banana")
            .await
            .unwrap();
        create_user(&pool, "u2", "bob@example.com", "Bob")
            .await
            .unwrap();

        let results = search_users(&pool, "ana", "u2").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "u1");

        // Caller is never in their own results
        let results = search_users(&pool, "ana", "u1").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_friend_pair_is_symmetric_and_idempotent() {
        let pool = setup_test_pool().await;
        create_user(&pool, "u1", "ana@example.com", "Ana")
            .await
            .unwrap();
        create_user(&pool, "u2", "bob@example.com", "Bob")
            .await
            .unwrap();

        add_friend_pair(&pool, "u1", "u2").await.unwrap();
        add_friend_pair(&pool, "u1", "u2").await.unwrap();

        let a = get_user(&pool, "u1").await.unwrap().unwrap();
        let b = get_user(&pool, "u2").await.unwrap().unwrap();
        assert_eq!(a.friends, vec!["u2".to_string()]);
        assert_eq!(b.friends, vec!["u1".to_string()]);

        remove_friend_pair(&pool, "u2", "u1").await.unwrap();
        let a = get_user(&pool, "u1").await.unwrap().unwrap();
        let b = get_user(&pool, "u2").await.unwrap().unwrap();
        assert!(a.friends.is_empty());
        assert!(b.friends.is_empty());
    }

    #[tokio::test]
    async fn test_get_users_by_ids_skips_missing() {
        let pool = setup_test_pool().await;
        create_user(&pool, "u1", "ana@example.com", "Ana")
            .await
            .unwrap();

        let users = get_users_by_ids(&pool, &["u1".to_string(), "ghost".to_string()])
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u1");
    }
}
