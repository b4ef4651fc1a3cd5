//! Application state.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::services::{
    AssetService, BlobStore, FriendshipService, FsBlobStore, RecordService, TokenService,
};
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Session token service.
    pub tokens: TokenService,
    /// Record lifecycle service.
    pub records: RecordService,
    /// Friendship graph service.
    pub friendships: FriendshipService,
    /// Attachment/avatar lifecycle service.
    pub assets: AssetService,
}

impl AppState {
    /// Create the production state from configuration: on-disk SQLite pool
    /// and a filesystem blob store.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        let db = crate::db::init_pool(&config.database.path).await?;
        crate::db::initialize_schema(&db).await?;

        let blobs = Arc::new(FsBlobStore::new(&config.storage.blobs_path));
        Ok(Self::assemble(db, blobs))
    }

    /// Wire services onto an already-initialized pool and blob store.
    /// Integration tests assemble over in-memory implementations.
    pub fn assemble(db: DbPool, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            tokens: TokenService::new(db.clone()),
            records: RecordService::new(db.clone()),
            friendships: FriendshipService::new(db.clone()),
            assets: AssetService::new(db.clone(), blobs),
            db,
        }
    }
}
