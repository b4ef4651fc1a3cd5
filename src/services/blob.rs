//! Blob storage seam.
//!
//! Attachments and avatars are stored under opaque names generated by the
//! lifecycle layer. The store is injected as a trait object so tests can
//! swap in an in-memory implementation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Error, Result};

/// Storage for binary blobs keyed by opaque name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Fetch a blob. A missing blob is `NotFound`: metadata may outlive the
    /// bytes, and the caller reports that as an absent resource rather than
    /// a storage failure.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>>;

    async fn delete(&self, name: &str) -> Result<()>;
}

/// Filesystem-backed blob store rooted at a single directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::Storage(format!("create blob dir: {}", e)))?;
        tokio::fs::write(self.path_for(name), bytes)
            .await
            .map_err(|e| Error::Storage(format!("write blob {}: {}", name, e)))
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        match tokio::fs::read(self.path_for(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("Blob not found: {}", name)))
            }
            Err(e) => Err(Error::Storage(format!("read blob {}: {}", name, e))),
        }
    }

    async fn delete(&self, name: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("Blob not found: {}", name)))
            }
            Err(e) => Err(Error::Storage(format!("delete blob {}: {}", name, e))),
        }
    }
}

/// In-memory blob store for tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Blob not found: {}", name)))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("Blob not found: {}", name)))
    }
}
