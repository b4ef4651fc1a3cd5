//! Friendship edge queries.
//!
//! The edge is presence-only and symmetric: (a, b) and (b, a) denote the
//! same logical friendship, so every query checks both directions.

use crate::models::User;
use crate::{Error, Result};

use super::DbPool;

/// Check whether a friendship edge exists between two users, in either
/// insertion direction.
pub async fn friendship_exists(pool: &DbPool, a: &str, b: &str) -> Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT 1 FROM friendships
        WHERE (user_id = ? AND friend_id = ?) OR (user_id = ? AND friend_id = ?)
        LIMIT 1
        "#,
    )
    .bind(a)
    .bind(b)
    .bind(b)
    .bind(a)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Insert a friendship edge. Callers are expected to have checked for
/// existence first; INSERT OR IGNORE keeps a lost race harmless.
pub async fn create_friendship(pool: &DbPool, a: &str, b: &str) -> Result<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO friendships (user_id, friend_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(a)
    .bind(b)
    .bind(crate::models::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete the friendship edge in both directions. Deleting an absent edge
/// is a no-op.
pub async fn delete_friendship(pool: &DbPool, a: &str, b: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM friendships
        WHERE (user_id = ? AND friend_id = ?) OR (user_id = ? AND friend_id = ?)
        "#,
    )
    .bind(a)
    .bind(b)
    .bind(b)
    .bind(a)
    .execute(pool)
    .await?;
    Ok(())
}

/// All users connected to `user_id` by an edge, in either direction.
pub async fn list_friends(pool: &DbPool, user_id: &str) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        JOIN friendships f ON u.id = f.friend_id
        WHERE f.user_id = ?
        UNION
        SELECT u.* FROM users u
        JOIN friendships f ON u.id = f.user_id
        WHERE f.friend_id = ?
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_user, init_pool, initialize_schema};
    use crate::models::User;

    async fn setup() -> (DbPool, User, User) {
        let pool = init_pool(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        let a = create_user(
            &pool,
            &User::new("a".into(), "a".into(), "alice".into(), "a@t".into(), "d".into()),
        )
        .await
        .unwrap();
        let b = create_user(
            &pool,
            &User::new("b".into(), "b".into(), "bob".into(), "b@t".into(), "d".into()),
        )
        .await
        .unwrap();
        (pool, a, b)
    }

    #[tokio::test]
    async fn test_existence_is_symmetric() {
        let (pool, a, b) = setup().await;

        create_friendship(&pool, &a.id, &b.id).await.unwrap();
        assert!(friendship_exists(&pool, &a.id, &b.id).await.unwrap());
        assert!(friendship_exists(&pool, &b.id, &a.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_listing_sees_both_directions() {
        let (pool, a, b) = setup().await;

        create_friendship(&pool, &a.id, &b.id).await.unwrap();

        let friends_of_a = list_friends(&pool, &a.id).await.unwrap();
        let friends_of_b = list_friends(&pool, &b.id).await.unwrap();
        assert_eq!(friends_of_a.len(), 1);
        assert_eq!(friends_of_a[0].id, b.id);
        assert_eq!(friends_of_b.len(), 1);
        assert_eq!(friends_of_b[0].id, a.id);
    }

    #[tokio::test]
    async fn test_delete_absent_edge_is_noop() {
        let (pool, a, b) = setup().await;

        delete_friendship(&pool, &a.id, &b.id).await.unwrap();
        assert!(!friendship_exists(&pool, &a.id, &b.id).await.unwrap());
    }
}
