//! Database layer for Tally.
//!
//! Provides SQLite connection pooling and query modules
//! for all domain entities.

mod assets;
mod friendships;
mod records;
mod tokens;
mod users;

pub use assets::*;
pub use friendships::*;
pub use records::*;
pub use tokens::*;
pub use users::*;

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Creates parent directories if needed and configures SQLite for
/// concurrent access. `case_sensitive_like` is on so that user search
/// keeps the case-sensitive wildcard semantics of the API contract.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = SqliteConnectOptions::from_str(path)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30))
        .foreign_keys(true)
        .pragma("case_sensitive_like", "on");

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await?;

    info!("Database pool initialized: {}", path);

    Ok(pool)
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    for statement in schema.split(';') {
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_initialization() {
        let pool = init_pool(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        assert!(table_names.contains(&"users"), "users table missing");
        assert!(table_names.contains(&"tokens"), "tokens table missing");
        assert!(table_names.contains(&"records"), "records table missing");
        assert!(
            table_names.contains(&"record_companions"),
            "record_companions table missing"
        );
        assert!(table_names.contains(&"friendships"), "friendships table missing");
        assert!(table_names.contains(&"attachments"), "attachments table missing");
        assert!(table_names.contains(&"avatars"), "avatars table missing");
    }

    #[tokio::test]
    async fn test_like_is_case_sensitive() {
        let pool = init_pool(":memory:").await.unwrap();

        let hit: Option<(i64,)> = sqlx::query_as("SELECT 1 WHERE 'Sheng' LIKE '%shen%'")
            .fetch_optional(&pool)
            .await
            .unwrap();
        assert!(hit.is_none());
    }
}
