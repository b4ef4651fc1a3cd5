//! Service layer for Tally.
//!
//! Contains the request-scoped orchestration and the seams to external
//! collaborators:
//! - Token (issue/reuse, authenticate, revoke device-scoped tokens)
//! - Guard (ownership, soft-delete and parent-reference checks)
//! - Record (record + companion-set composition)
//! - Friendship (idempotent symmetric edge management)
//! - Asset (attachment/avatar lifecycle over the BlobStore)
//! - Blob (BlobStore trait, filesystem and in-memory implementations)
//! - Password (argon2 digest interface)

mod asset;
mod blob;
mod friendship;
pub mod guard;
pub mod password;
mod record;
mod token;

pub use asset::AssetService;
pub use blob::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use friendship::FriendshipService;
pub use record::RecordService;
pub use token::TokenService;
