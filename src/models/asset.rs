//! Binary asset metadata: record attachments and user avatars.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Metadata row for a file attached to a record. The `name` is the opaque
/// blob-store key; the client-supplied filename is kept only for headers.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub record_id: String,
    pub name: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(record_id: &str, name: String, filename: String) -> Self {
        Self {
            id: super::new_id(),
            record_id: record_id.to_string(),
            name,
            filename,
            created_at: super::now(),
        }
    }
}

/// Metadata row for a user avatar. Same shape as [`Attachment`] but scoped to
/// a user; the service always targets the latest row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Avatar {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

impl Avatar {
    pub fn new(user_id: &str, name: String, filename: String) -> Self {
        Self {
            id: super::new_id(),
            user_id: user_id.to_string(),
            name,
            filename,
            created_at: super::now(),
        }
    }
}

/// Client-facing handle for an uploaded asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
}

impl From<Attachment> for Asset {
    fn from(a: Attachment) -> Self {
        Asset { id: a.id }
    }
}

impl From<Avatar> for Asset {
    fn from(a: Avatar) -> Self {
        Asset { id: a.id }
    }
}
