//! Attachment and avatar lifecycle.
//!
//! Every asset is a metadata row plus a blob under an opaque generated
//! name. Ordering is fixed and deliberate:
//!   - upload: save the blob first, then insert the row, so a row never
//!     points at bytes that were never written;
//!   - replace (avatar): save the new generation fully before touching the
//!     old one, so a failed cleanup leaves a working avatar, not none;
//!   - delete: remove the blob before the row, so a failed blob delete
//!     keeps the row as a retryable pointer instead of orphaning bytes.
//! A failed step is reported as a failure even when the steps before it
//! already stand.

use std::sync::Arc;

use tracing::debug;

use crate::db::{self, DbPool};
use crate::models::{self, Attachment, Avatar};
use crate::services::BlobStore;
use crate::Result;

#[derive(Clone)]
pub struct AssetService {
    db: DbPool,
    blobs: Arc<dyn BlobStore>,
}

impl AssetService {
    pub fn new(db: DbPool, blobs: Arc<dyn BlobStore>) -> Self {
        Self { db, blobs }
    }

    /// Store a new avatar and retire the previous one.
    ///
    /// The new blob and row are committed before the old generation is
    /// removed. If removing the old blob or row fails, the error surfaces
    /// to the caller, but the new avatar is already in place and `latest`
    /// resolution will prefer it.
    pub async fn upload_avatar(
        &self,
        user_id: &str,
        filename: String,
        bytes: &[u8],
    ) -> Result<Avatar> {
        let previous = db::latest_avatar(&self.db, user_id).await?;

        let name = models::new_id();
        self.blobs.save(&name, bytes).await?;
        let avatar = db::create_avatar(&self.db, &Avatar::new(user_id, name, filename)).await?;

        if let Some(old) = previous {
            debug!(user = user_id, old = %old.id, "retiring replaced avatar");
            self.blobs.delete(&old.name).await?;
            db::delete_avatar(&self.db, &old.id).await?;
        }

        Ok(avatar)
    }

    pub async fn get_avatar(&self, id: &str) -> Result<Option<Avatar>> {
        db::get_avatar(&self.db, id).await
    }

    pub async fn download_avatar(&self, avatar: &Avatar) -> Result<Vec<u8>> {
        self.blobs.fetch(&avatar.name).await
    }

    /// Remove an avatar, blob before metadata.
    pub async fn delete_avatar(&self, avatar: &Avatar) -> Result<()> {
        self.blobs.delete(&avatar.name).await?;
        db::delete_avatar(&self.db, &avatar.id).await
    }

    /// Store an attachment for a record. Attachments accumulate; there is
    /// no replacement semantics.
    pub async fn upload_attachment(
        &self,
        record_id: &str,
        filename: String,
        bytes: &[u8],
    ) -> Result<Attachment> {
        let name = models::new_id();
        self.blobs.save(&name, bytes).await?;
        db::create_attachment(&self.db, &Attachment::new(record_id, name, filename)).await
    }

    pub async fn get_attachment(&self, id: &str) -> Result<Option<Attachment>> {
        db::get_attachment(&self.db, id).await
    }

    pub async fn download_attachment(&self, attachment: &Attachment) -> Result<Vec<u8>> {
        self.blobs.fetch(&attachment.name).await
    }

    /// Remove an attachment, blob before metadata.
    pub async fn delete_attachment(&self, attachment: &Attachment) -> Result<()> {
        self.blobs.delete(&attachment.name).await?;
        db::delete_attachment(&self.db, &attachment.id).await
    }
}
