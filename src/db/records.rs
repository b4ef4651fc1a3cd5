//! Record and companion-edge queries.

use crate::models::{Record, User};
use crate::{Error, Result};

use super::DbPool;

/// Insert a new record.
pub async fn create_record(pool: &DbPool, record: &Record) -> Result<Record> {
    sqlx::query_as::<_, Record>(
        r#"
        INSERT INTO records (id, user_id, title, note, date, mood, amount, currency, is_deleted, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(&record.title)
    .bind(&record.note)
    .bind(record.date)
    .bind(&record.mood)
    .bind(record.amount)
    .bind(&record.currency)
    .bind(record.is_deleted)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get a record by ID, deleted or not. Visibility of soft-deleted records
/// is the guard layer's concern, not the query's.
pub async fn get_record(pool: &DbPool, id: &str) -> Result<Option<Record>> {
    sqlx::query_as::<_, Record>("SELECT * FROM records WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// All undeleted records owned by a user, newest date first.
pub async fn list_records(pool: &DbPool, user_id: &str) -> Result<Vec<Record>> {
    sqlx::query_as::<_, Record>(
        r#"
        SELECT * FROM records
        WHERE user_id = ? AND is_deleted = 0
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Apply field updates from a request body.
pub async fn update_record(pool: &DbPool, record: &Record) -> Result<Record> {
    sqlx::query_as::<_, Record>(
        r#"
        UPDATE records
        SET title = ?, note = ?, date = ?, mood = ?, amount = ?, currency = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&record.title)
    .bind(&record.note)
    .bind(record.date)
    .bind(&record.mood)
    .bind(record.amount)
    .bind(&record.currency)
    .bind(crate::models::now())
    .bind(&record.id)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Set the soft-delete flag. The row and its attachments stay behind as
/// referentially valid history.
pub async fn mark_record_deleted(pool: &DbPool, id: &str) -> Result<()> {
    sqlx::query("UPDATE records SET is_deleted = 1, updated_at = ? WHERE id = ?")
        .bind(crate::models::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Attach a companion edge. Duplicate ids in a request collapse to one edge.
pub async fn attach_companion(pool: &DbPool, record_id: &str, user_id: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO record_companions (record_id, user_id) VALUES (?, ?)")
        .bind(record_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Detach every companion edge of a record.
pub async fn detach_all_companions(pool: &DbPool, record_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM record_companions WHERE record_id = ?")
        .bind(record_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Resolve the companions of a record.
pub async fn list_companions(pool: &DbPool, record_id: &str) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM users u
        JOIN record_companions rc ON u.id = rc.user_id
        WHERE rc.record_id = ?
        ORDER BY u.username
        "#,
    )
    .bind(record_id)
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_user, init_pool, initialize_schema};
    use crate::models::{RecordBody, User};

    async fn setup() -> (DbPool, User) {
        let pool = init_pool(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        let user = create_user(
            &pool,
            &User::new("s".into(), "w".into(), "sheng".into(), "s@t".into(), "d".into()),
        )
        .await
        .unwrap();
        (pool, user)
    }

    fn sample_body() -> RecordBody {
        serde_json::from_value(serde_json::json!({
            "title": "dinner",
            "note": "birthday",
            "date": "2024-05-01T19:00:00Z",
            "mood": "great",
            "amount": 42.0,
            "currency": "EUR"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_record_round_trip() {
        let (pool, user) = setup().await;

        let record = create_record(&pool, &Record::from_body(&user.id, &sample_body()))
            .await
            .unwrap();
        let fetched = get_record(&pool, &record.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "dinner");
        assert_eq!(fetched.mood, "great");
        assert!(!fetched.is_deleted);
    }

    #[tokio::test]
    async fn test_listing_skips_soft_deleted() {
        let (pool, user) = setup().await;

        let record = create_record(&pool, &Record::from_body(&user.id, &sample_body()))
            .await
            .unwrap();
        assert_eq!(list_records(&pool, &user.id).await.unwrap().len(), 1);

        mark_record_deleted(&pool, &record.id).await.unwrap();
        assert!(list_records(&pool, &user.id).await.unwrap().is_empty());

        // The row itself survives.
        assert!(get_record(&pool, &record.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_companion_edges_are_presence_only() {
        let (pool, user) = setup().await;
        let friend = create_user(
            &pool,
            &User::new("b".into(), "b".into(), "bob".into(), "b@t".into(), "d".into()),
        )
        .await
        .unwrap();

        let record = create_record(&pool, &Record::from_body(&user.id, &sample_body()))
            .await
            .unwrap();

        attach_companion(&pool, &record.id, &friend.id).await.unwrap();
        attach_companion(&pool, &record.id, &friend.id).await.unwrap();
        assert_eq!(list_companions(&pool, &record.id).await.unwrap().len(), 1);

        detach_all_companions(&pool, &record.id).await.unwrap();
        assert!(list_companions(&pool, &record.id).await.unwrap().is_empty());
    }
}
