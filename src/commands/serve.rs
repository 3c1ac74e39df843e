// src/commands/serve.rs

//! The `serve` command

use anyhow::{Context, Result};
use potluck::server::{PotluckConfig, run_server};
use std::path::{Path, PathBuf};

/// Run the HTTP server until interrupted
///
/// Flags take precedence over the configuration file.
pub fn cmd_serve(db_path: Option<&str>, config: Option<&str>, bind: Option<&str>) -> Result<()> {
    let mut file_config = match config {
        Some(path) => PotluckConfig::load(Path::new(path))?,
        None => PotluckConfig::new(),
    };

    if let Some(db_path) = db_path {
        file_config.storage.db_path = PathBuf::from(db_path);
    }
    if let Some(bind) = bind {
        file_config.server.bind = bind.to_string();
    }
    file_config.validate()?;
    let server_config = file_config.to_server_config()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(run_server(server_config))
}
