//! Friendship graph service.
//!
//! Edges are symmetric and presence-only; add and remove are idempotent.
//! Friendship absence is the one place where `NotFound` is legitimate:
//! the edge itself is the queried fact, not an owned object.

use tracing::debug;

use crate::db::{self, DbPool};
use crate::models::User;
use crate::{Error, Result};

#[derive(Clone)]
pub struct FriendshipService {
    db: DbPool,
}

impl FriendshipService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Symmetric existence check.
    pub async fn exists(&self, a: &str, b: &str) -> Result<bool> {
        db::friendship_exists(&self.db, a, b).await
    }

    /// Add a friendship edge. A `person_id` that does not resolve is a
    /// `BadRequest`; an already-present edge is success-as-no-op.
    pub async fn add(&self, user: &User, person_id: &str) -> Result<()> {
        let person = db::get_user(&self.db, person_id)
            .await?
            .ok_or_else(|| Error::BadRequest(format!("No such user: {}", person_id)))?;

        if self.exists(&user.id, &person.id).await? {
            debug!(user = %user.id, person = %person.id, "friendship already present");
            return Ok(());
        }

        db::create_friendship(&self.db, &user.id, &person.id).await
    }

    /// Remove a friendship edge. Removing an absent edge is a no-op.
    pub async fn remove(&self, user: &User, person_id: &str) -> Result<()> {
        db::delete_friendship(&self.db, &user.id, person_id).await
    }

    /// All users connected to `user` by an edge, in either direction.
    pub async fn list_friends(&self, user: &User) -> Result<Vec<User>> {
        db::list_friends(&self.db, &user.id).await
    }

    /// Resolve one friend. No edge (or no such candidate) is `NotFound`.
    pub async fn get_one(&self, user: &User, candidate_id: &str) -> Result<User> {
        let candidate = db::get_user(&self.db, candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No friendship with {}", candidate_id)))?;

        if !self.exists(&user.id, &candidate.id).await? {
            return Err(Error::NotFound(format!("No friendship with {}", candidate_id)));
        }

        Ok(candidate)
    }
}
