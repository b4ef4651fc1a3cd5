//! Session token queries.

use crate::models::Token;
use crate::{Error, Result};

use super::DbPool;

/// Insert a new token.
pub async fn create_token(pool: &DbPool, token: &Token) -> Result<Token> {
    sqlx::query_as::<_, Token>(
        r#"
        INSERT INTO tokens (id, user_id, value, os_name, time_zone, is_revoked, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&token.id)
    .bind(&token.user_id)
    .bind(&token.value)
    .bind(&token.os_name)
    .bind(&token.time_zone)
    .bind(token.is_revoked)
    .bind(token.created_at)
    .fetch_one(pool)
    .await
    .map_err(Error::Database)
}

/// Look up a token by its opaque value.
pub async fn get_token_by_value(pool: &DbPool, value: &str) -> Result<Option<Token>> {
    sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE value = ?")
        .bind(value)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// Look up the active (non-revoked) token for an exact device tuple.
///
/// After a logout + re-login cycle a revoked row coexists with an active one
/// for the same tuple; only the active row is of interest here.
pub async fn get_active_device_token(
    pool: &DbPool,
    user_id: &str,
    os_name: &str,
    time_zone: &str,
) -> Result<Option<Token>> {
    sqlx::query_as::<_, Token>(
        r#"
        SELECT * FROM tokens
        WHERE user_id = ? AND os_name = ? AND time_zone = ? AND is_revoked = 0
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(os_name)
    .bind(time_zone)
    .fetch_optional(pool)
    .await
    .map_err(Error::Database)
}

/// Mark a token revoked. Tokens are never physically deleted.
pub async fn revoke_token(pool: &DbPool, id: &str) -> Result<()> {
    sqlx::query("UPDATE tokens SET is_revoked = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
