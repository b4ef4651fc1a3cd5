//! Configuration management for Tally.
//!
//! Loads configuration from environment variables once at startup.

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory for attachment/avatar blobs.
    pub blobs_path: String,
    /// Upper bound for upload bodies, in bytes.
    pub max_upload_size: usize,
}

impl Config {
    fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env_or("TALLY_HOST", "0.0.0.0"),
                port: env_or("TALLY_PORT", "8080").parse().unwrap_or(8080),
            },
            database: DatabaseConfig {
                path: env_or("TALLY_DB_PATH", "data/tally.db"),
            },
            storage: StorageConfig {
                blobs_path: env_or("TALLY_BLOBS_PATH", "data/blobs"),
                max_upload_size: env_or("TALLY_MAX_UPLOAD_SIZE", "1048576")
                    .parse()
                    .unwrap_or(1024 * 1024),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
