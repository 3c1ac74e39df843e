// src/server/mod.rs
//! Potluck HTTP server
//!
//! This module provides an axum server that:
//! - Renders every page as a JSON view context
//! - Identifies the viewer from a trusted header set by an upstream proxy
//! - Serves recipe images from the media directory
//!
//! Each request opens its own SQLite connection on the blocking pool.

mod auth;
pub mod config;
mod handlers;
mod routes;

pub use auth::{MaybeViewer, Viewer};
pub use config::PotluckConfig;
pub use handlers::ApiError;
pub use routes::create_router;

use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Default identity header written by the authenticating proxy
pub const DEFAULT_USER_HEADER: &str = "X-Potluck-User";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
    /// Path to the Potluck database
    pub db_path: PathBuf,
    /// Directory served under `/media`
    pub media_dir: PathBuf,
    /// Request header carrying the viewer's username
    pub user_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let db_path = PathBuf::from("potluck.db");
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            media_dir: crate::db::paths::media_dir(&db_path),
            db_path,
            user_header: DEFAULT_USER_HEADER.to_string(),
        }
    }
}

/// Shared server state
#[derive(Debug)]
pub struct ServerState {
    pub config: ServerConfig,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

/// Start the Potluck server
pub async fn run_server(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting Potluck server on {}", config.bind_addr);
    tracing::info!("Database: {:?}", config.db_path);
    tracing::info!("Media directory: {:?}", config.media_dir);
    tracing::info!("Viewer header: {}", config.user_header);

    // Fail before binding if the database was never initialized
    crate::db::open(&config.db_path)?;

    if !config.media_dir.exists() {
        std::fs::create_dir_all(&config.media_dir)?;
        tracing::info!("Created media directory {:?}", config.media_dir);
    }

    let state = Arc::new(ServerState::new(config.clone()));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Potluck is ready to serve");

    axum::serve(listener, app).await?;
    Ok(())
}
