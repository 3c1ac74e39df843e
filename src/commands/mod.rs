// src/commands/mod.rs
//! Command handlers for the Potluck CLI

mod demo;
#[cfg(feature = "server")]
mod serve;

pub use demo::{cmd_seed, cmd_unseed};
#[cfg(feature = "server")]
pub use serve::cmd_serve;

use anyhow::Result;
use tracing::info;

/// Create the database file and apply migrations
pub fn cmd_init(db_path: &str) -> Result<()> {
    info!("Initializing Potluck database at: {}", db_path);
    potluck::db::init(db_path)?;
    println!("Database initialized successfully at: {}", db_path);
    Ok(())
}
