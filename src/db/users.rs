//! User queries.

use crate::models::{PublicUser, User};
use crate::{Error, Result};

use super::DbPool;

/// Insert a new user. A username collision is reported as `BadRequest`
/// rather than leaking a raw constraint violation.
pub async fn create_user(pool: &DbPool, user: &User) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, first_name, last_name, username, email, password_digest, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_digest)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            Error::BadRequest(format!("Username already taken: {}", user.username))
        }
        _ => Error::Database(e),
    })
}

/// Get a user by ID, or None.
pub async fn get_user(pool: &DbPool, id: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// Get a user by username (login lookup).
pub async fn get_user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)
}

/// Input for updating a user's profile.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Update a user's profile fields.
pub async fn update_user(pool: &DbPool, id: &str, input: UpdateUser) -> Result<User> {
    let mut updates = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(first_name) = input.first_name {
        updates.push("first_name = ?");
        bindings.push(first_name);
    }
    if let Some(last_name) = input.last_name {
        updates.push("last_name = ?");
        bindings.push(last_name);
    }
    if let Some(email) = input.email {
        updates.push("email = ?");
        bindings.push(email);
    }

    if updates.is_empty() {
        return get_user(pool, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User not found: {}", id)));
    }

    updates.push("updated_at = datetime('now')");

    let query = format!(
        "UPDATE users SET {} WHERE id = ? RETURNING *",
        updates.join(", ")
    );

    let mut q = sqlx::query_as::<_, User>(&query);
    for binding in &bindings {
        q = q.bind(binding);
    }
    q = q.bind(id);

    q.fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User not found: {}", id)))
}

/// Case-sensitive substring search over usernames.
pub async fn search_users(pool: &DbPool, key: &str) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE username LIKE ? ORDER BY username",
    )
    .bind(format!("%{}%", key))
    .fetch_all(pool)
    .await
    .map_err(Error::Database)
}

/// Resolve a list of user ids to users. Unknown ids are silently dropped;
/// the companion join is best effort by contract.
pub async fn get_users_by_ids(pool: &DbPool, ids: &[String]) -> Result<Vec<User>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let query = format!("SELECT * FROM users WHERE id IN ({})", placeholders);

    let mut q = sqlx::query_as::<_, User>(&query);
    for id in ids {
        q = q.bind(id);
    }

    q.fetch_all(pool).await.map_err(Error::Database)
}

/// Build the public representation of a user, joining in the latest avatar.
pub async fn make_public_user(
    pool: &DbPool,
    user: User,
    token: Option<String>,
) -> Result<PublicUser> {
    let asset = super::latest_avatar(pool, &user.id)
        .await?
        .map(crate::models::Asset::from);
    Ok(user.into_public(token, asset))
}

/// Public representations for a batch of users (token always absent).
pub async fn make_public_users(pool: &DbPool, users: Vec<User>) -> Result<Vec<PublicUser>> {
    let mut publics = Vec::with_capacity(users.len());
    for user in users {
        publics.push(make_public_user(pool, user, None).await?);
    }
    Ok(publics)
}
