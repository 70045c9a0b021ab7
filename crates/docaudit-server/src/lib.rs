//! Docaudit Server
//!
//! HTTP surface for the document analysis service: PDF upload with text
//! extraction, analysis of stored documents through the LLM pipeline, and
//! read endpoints for documents and counters. Everything interesting happens
//! in `docaudit-analyzer`; this crate is transport plumbing.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod pdf;

use config::ServerConfig;
use docaudit_store::SqliteStore;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Storage initialization error
    #[error("storage error: {0}")]
    Store(#[from] docaudit_store::StoreError),

    /// Server binding error
    #[error("failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Initializes the database (creating its directory and schema if absent)
/// and serves until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting docaudit server");
    info!("Bind address: {}", config.bind_addr);
    info!("Model: {}", config.model);
    info!("Database: {}", config.db_path.display());
    if config.api_key.is_none() {
        info!("No completion credential configured; analysis requests will fail");
    }

    // Open once at startup so schema problems surface before serving
    SqliteStore::open(&config.db_path)?;

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
