//! User model and its public representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Asset;

/// A user of the journal. Users are never hard-deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated id. The caller supplies an
    /// already-hashed password digest.
    pub fn new(
        first_name: String,
        last_name: String,
        username: String,
        email: String,
        password_digest: String,
    ) -> Self {
        let now = super::now();
        Self {
            id: super::new_id(),
            first_name,
            last_name,
            username,
            email,
            password_digest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the client-facing representation. The password digest is never
    /// serialized; `token` is carried only on signup/login responses.
    pub fn into_public(self, token: Option<String>, asset: Option<Asset>) -> PublicUser {
        PublicUser {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            email: self.email,
            token,
            asset,
        }
    }
}

/// Client-facing user representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// Present only on signup/login responses, null everywhere else.
    pub token: Option<String>,
    /// The user's latest avatar, if any.
    pub asset: Option<Asset>,
}
