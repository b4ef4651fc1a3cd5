//! Record lifecycle: create, read, update, soft-delete, and the companion
//! set that rides along with every write.
//!
//! Companion handling is replace-not-merge: each create or update resolves
//! the ids in the body and makes that the complete companion set. Unknown
//! ids are dropped rather than rejected.

use crate::db::{self, DbPool};
use crate::models::{IntactRecord, PublicUser, Record, RecordBody, User};
use crate::services::guard;
use crate::Result;

#[derive(Clone)]
pub struct RecordService {
    db: DbPool,
}

impl RecordService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Create a record and attach its companions.
    ///
    /// The insert and the companion resolution run concurrently; both run
    /// to completion even if one fails, so a failure never leaves a
    /// half-cancelled sibling behind.
    pub async fn create(&self, user: &User, body: &RecordBody) -> Result<IntactRecord> {
        let record = Record::from_body(&user.id, body);

        let (inserted, companions) = tokio::join!(
            db::create_record(&self.db, &record),
            self.resolve_companions(&body.companion_ids),
        );
        let inserted = inserted?;
        let companions = companions?;

        self.attach_companions(&inserted.id, &companions).await?;
        Ok(inserted.into_intact(companions))
    }

    /// Read a single record with companions. Only the owner sees it, and
    /// soft-deleted records read as absent.
    pub async fn get_intact(&self, user: &User, record_id: &str) -> Result<IntactRecord> {
        let record = self.owned_active(user, record_id).await?;
        let companions = self.companions_of(&record.id).await?;
        Ok(record.into_intact(companions))
    }

    /// All of the caller's undeleted records, hydrated, newest date first.
    pub async fn list(&self, user: &User) -> Result<Vec<IntactRecord>> {
        let records = db::list_records(&self.db, &user.id).await?;
        let mut intact = Vec::with_capacity(records.len());
        for record in records {
            let companions = self.companions_of(&record.id).await?;
            intact.push(record.into_intact(companions));
        }
        Ok(intact)
    }

    /// Replace a record's fields and its companion set.
    ///
    /// The field update and the old-edge teardown run concurrently with the
    /// companion resolution; as with create, siblings run to completion.
    pub async fn update(
        &self,
        user: &User,
        record_id: &str,
        body: &RecordBody,
    ) -> Result<IntactRecord> {
        let mut record = self.owned_active(user, record_id).await?;
        record.title = body.title.clone();
        record.note = body.note.clone();
        record.date = body.date;
        record.mood = body.mood.as_str().to_string();
        record.amount = body.amount;
        record.currency = body.currency.clone();

        let (updated, detached, companions) = tokio::join!(
            db::update_record(&self.db, &record),
            db::detach_all_companions(&self.db, &record.id),
            self.resolve_companions(&body.companion_ids),
        );
        let updated = updated?;
        detached?;
        let companions = companions?;

        self.attach_companions(&updated.id, &companions).await?;
        Ok(updated.into_intact(companions))
    }

    /// Soft-delete a record. The row and its attachments stay behind;
    /// deleting an already-deleted record reads as absent.
    pub async fn delete(&self, user: &User, record_id: &str) -> Result<()> {
        let record = self.owned_active(user, record_id).await?;
        db::mark_record_deleted(&self.db, &record.id).await
    }

    /// Look up the caller's active record, for handlers that need the raw
    /// row (attachment routes resolve ownership through this).
    pub async fn owned_active(&self, user: &User, record_id: &str) -> Result<Record> {
        let record = db::get_record(&self.db, record_id).await?;
        guard::require_active(guard::require_owner(user, record)?)
    }

    /// Like `owned_active` but without the active check; attachment download
    /// and delete work on soft-deleted records too.
    pub async fn owned(&self, user: &User, record_id: &str) -> Result<Record> {
        let record = db::get_record(&self.db, record_id).await?;
        guard::require_owner(user, record)
    }

    async fn resolve_companions(&self, ids: &[String]) -> Result<Vec<PublicUser>> {
        let users = db::get_users_by_ids(&self.db, ids).await?;
        db::make_public_users(&self.db, users).await
    }

    async fn attach_companions(
        &self,
        record_id: &str,
        companions: &[PublicUser],
    ) -> Result<()> {
        for companion in companions {
            db::attach_companion(&self.db, record_id, &companion.id).await?;
        }
        Ok(())
    }

    async fn companions_of(&self, record_id: &str) -> Result<Vec<PublicUser>> {
        let users = db::list_companions(&self.db, record_id).await?;
        db::make_public_users(&self.db, users).await
    }
}
