//! Tally - personal finance and mood journal service.
//!
//! Users keep financial "records" tagged with a mood and the friends who
//! were there, maintain a friendship graph, and attach binary files
//! (record attachments, profile avatars).

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
