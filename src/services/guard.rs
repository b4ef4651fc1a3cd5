//! Authorization guard predicates.
//!
//! One predicate family applied before any mutation or any read of a
//! resource that is not the caller's own profile. The central policy is
//! information hiding: a caller probing someone else's resource id cannot
//! tell "exists but not yours" from "does not exist" - both are
//! `Unauthorized`. The only deliberate exception is friendship absence,
//! which is a legitimate `NotFound` because the edge itself is the queried
//! fact.

use crate::models::{Attachment, Avatar, Record, User};
use crate::{Error, Result};

/// A resource owned by a single user.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

impl Owned for Record {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for Avatar {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// A child resource bound to a parent by reference.
pub trait Attached {
    fn parent_id(&self) -> &str;
}

impl Attached for Attachment {
    fn parent_id(&self) -> &str {
        &self.record_id
    }
}

impl Attached for Avatar {
    fn parent_id(&self) -> &str {
        &self.user_id
    }
}

/// Require that a path user id is the caller's own. Runs before any lookup,
/// so a non-existent id is indistinguishable from someone else's.
pub fn require_self(caller: &User, path_user_id: &str) -> Result<()> {
    if caller.id != path_user_id {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

/// Require that a looked-up resource exists and belongs to the caller.
/// Absent and foreign-owned collapse to the same `Unauthorized`.
pub fn require_owner<T: Owned>(caller: &User, resource: Option<T>) -> Result<T> {
    match resource {
        Some(r) if r.owner_id() == caller.id => Ok(r),
        _ => Err(Error::Unauthorized),
    }
}

/// Require that a record has not been soft-deleted. Soft-deleted records
/// are invisible to read, update and attach, even for their owner.
pub fn require_active(record: Record) -> Result<Record> {
    if record.is_deleted {
        return Err(Error::NotFound(format!("Record not found: {}", record.id)));
    }
    Ok(record)
}

/// Require that a child resource exists and references the parent resolved
/// from the path. A mismatch is a `BadRequest` (cross-resource id
/// substitution), an absent child a plain `NotFound` - ownership of the
/// parent was already established.
pub fn require_attached<C: Attached>(child: Option<C>, parent_id: &str) -> Result<C> {
    match child {
        None => Err(Error::NotFound("Asset not found".to_string())),
        Some(c) if c.parent_id() == parent_id => Ok(c),
        Some(_) => Err(Error::BadRequest(
            "Asset does not belong to this resource".to_string(),
        )),
    }
}
