//! Environment configuration for the server.
//!
//! Loaded once at process start into an immutable structure that is passed
//! explicitly to the storage and completion collaborators - handlers never
//! read ambient environment state at call time.

use docaudit_llm::openai::{DEFAULT_API_BASE, DEFAULT_MODEL};
use std::env;
use std::path::PathBuf;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default SQLite database location
pub const DEFAULT_DB_PATH: &str = "data/docaudit.sqlite3";

/// Server configuration
///
/// A missing API key is tolerated here: the upload/listing surface works
/// without one, and analysis requests surface a configuration error.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (host:port)
    pub bind_addr: String,

    /// Completion service credential, if configured
    pub api_key: Option<String>,

    /// Completion model identifier
    pub model: String,

    /// Completion service base URL
    pub api_base: String,

    /// SQLite database path; the parent directory is created if absent
    pub db_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Recognized variables:
    ///
    /// - `DOCAUDIT_BIND_ADDR` (default `127.0.0.1:8080`)
    /// - `DOCAUDIT_API_KEY` (no default; analysis fails without it)
    /// - `DOCAUDIT_MODEL` (default `gpt-4o-mini`)
    /// - `DOCAUDIT_API_BASE` (default `https://api.openai.com/v1`)
    /// - `DOCAUDIT_DB_PATH` (default `data/docaudit.sqlite3`)
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("DOCAUDIT_BIND_ADDR", DEFAULT_BIND_ADDR),
            api_key: env::var("DOCAUDIT_API_KEY").ok().filter(|k| !k.is_empty()),
            model: env_or("DOCAUDIT_MODEL", DEFAULT_MODEL),
            api_base: env_or("DOCAUDIT_API_BASE", DEFAULT_API_BASE),
            db_path: PathBuf::from(env_or("DOCAUDIT_DB_PATH", DEFAULT_DB_PATH)),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
