// src/server/config.rs
//! Configuration file parsing for the Potluck server
//!
//! Supports TOML configuration files with the following sections:
//! - [server] - Bind address
//! - [storage] - Database file and media directory
//! - [auth] - Name of the trusted identity header

use crate::server::{DEFAULT_USER_HEADER, ServerConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
pub struct PotluckConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub auth: AuthSection,
}

/// Server configuration section
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

/// Storage configuration section
#[derive(Debug, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Defaults to `media/` next to the database
    #[serde(default)]
    pub media_dir: Option<PathBuf>,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            media_dir: None,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("potluck.db")
}

/// Authentication configuration section
#[derive(Debug, Deserialize)]
pub struct AuthSection {
    /// Header the authenticating proxy fills with the username
    #[serde(default = "default_user_header")]
    pub user_header: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            user_header: default_user_header(),
        }
    }
}

fn default_user_header() -> String {
    DEFAULT_USER_HEADER.to_string()
}

impl PotluckConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PotluckConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        let header = &self.auth.user_header;
        if header.is_empty() {
            anyhow::bail!("auth.user_header must not be empty");
        }
        axum::http::HeaderName::from_bytes(header.as_bytes())
            .with_context(|| format!("Invalid auth.user_header: {}", header))?;

        if self.storage.db_path.as_os_str().is_empty() {
            anyhow::bail!("storage.db_path must not be empty");
        }

        Ok(())
    }

    /// Convert to the internal ServerConfig structure
    pub fn to_server_config(&self) -> Result<ServerConfig> {
        let bind_addr = self
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        let media_dir = self
            .storage
            .media_dir
            .clone()
            .unwrap_or_else(|| crate::db::paths::media_dir(&self.storage.db_path));

        Ok(ServerConfig {
            bind_addr,
            db_path: self.storage.db_path.clone(),
            media_dir,
            user_header: self.auth.user_header.clone(),
        })
    }
}
