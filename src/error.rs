// src/error.rs

//! Error types for Potluck

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Library error type
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite failure (includes uniqueness and foreign key violations)
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Database or directory initialization failed
    #[error("Initialization error: {0}")]
    InitError(String),

    /// A recipe, user or other record does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The viewer is not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No viewer could be identified for a login-required operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl Error {
    /// Short machine-readable kind, used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "database_error",
            Self::IoError(_) => "io_error",
            Self::InitError(_) => "init_error",
            Self::NotFoundError(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::Unauthorized(_) => "unauthorized",
            Self::AlreadyExists(_) => "already_exists",
            Self::ParseError(_) => "parse_error",
        }
    }

    /// True when the error is a SQLite UNIQUE constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}
