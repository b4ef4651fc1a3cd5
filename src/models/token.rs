//! Session token model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A device-scoped bearer token. A user may hold one token per device
/// fingerprint (`os_name`, `time_zone`); logout revokes rather than deletes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub user_id: String,
    pub value: String,
    pub os_name: String,
    pub time_zone: String,
    pub is_revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(user_id: String, value: String, os_name: String, time_zone: String) -> Self {
        Self {
            id: super::new_id(),
            user_id,
            value,
            os_name,
            time_zone,
            is_revoked: false,
            created_at: super::now(),
        }
    }
}
