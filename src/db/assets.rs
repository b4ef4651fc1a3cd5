//! Attachment and avatar metadata queries.

use crate::models::{Attachment, Avatar};
use crate::{Error, Result};

use super::DbPool;

/// Insert attachment metadata.
pub async fn create_attachment(pool: &DbPool, attachment: &Attachment) -> Result<Attachment> {
    sqlx::query_as::<_, Attachment>(
        r#"
        INSERT INTO attachments (id, record_id, name, filename, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&attachment.id)
    .bind(&attachment.record_id)
    .bind(&attachment.name)
    .bind(&attachment.filename)
    .bind(attachment.created_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get attachment metadata by ID, or None.
pub async fn get_attachment(pool: &DbPool, id: &str) -> Result<Option<Attachment>> {
    sqlx::query_as::<_, Attachment>("SELECT * FROM attachments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// Delete attachment metadata. Blob deletion is the lifecycle layer's job
/// and happens strictly before this.
pub async fn delete_attachment(pool: &DbPool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM attachments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert avatar metadata.
pub async fn create_avatar(pool: &DbPool, avatar: &Avatar) -> Result<Avatar> {
    sqlx::query_as::<_, Avatar>(
        r#"
        INSERT INTO avatars (id, user_id, name, filename, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&avatar.id)
    .bind(&avatar.user_id)
    .bind(&avatar.name)
    .bind(&avatar.filename)
    .bind(avatar.created_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Get avatar metadata by ID, or None.
pub async fn get_avatar(pool: &DbPool, id: &str) -> Result<Option<Avatar>> {
    sqlx::query_as::<_, Avatar>("SELECT * FROM avatars WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// The user's current avatar. The table permits many rows per user; the
/// service always targets the newest one.
pub async fn latest_avatar(pool: &DbPool, user_id: &str) -> Result<Option<Avatar>> {
    sqlx::query_as::<_, Avatar>(
        r#"
        SELECT * FROM avatars
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(Error::Database)
}

/// Delete avatar metadata.
pub async fn delete_avatar(pool: &DbPool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM avatars WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
