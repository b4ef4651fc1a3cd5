//! Data models for Tally.
//!
//! Defines the core types used throughout the system: users, tokens,
//! records and their companions, and binary assets.

mod asset;
mod record;
mod token;
mod user;

pub use asset::*;
pub use record::*;
pub use token::*;
pub use user::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
