// src/lib.rs

//! Potluck: social recipe sharing
//!
//! Users publish recipes with ingredients, steps and tags, rate and comment
//! on each other's recipes, follow authors and keep favourites.
//!
//! # Architecture
//!
//! - Database-first: all state in SQLite, one connection per request
//! - Forms: submitted key/value pairs are rebuilt into typed rows, edited
//!   (add/delete row actions) and validated without touching the database
//! - Views: every page produces a serialisable context naming its template
//! - Server: axum handlers behind an authenticating proxy (feature `server`)

pub mod browse;
pub mod db;
pub mod demo;
pub mod detail;
pub mod editor;
mod error;
pub mod forms;
pub mod profile;
pub mod progress;
pub mod social;

#[cfg(feature = "server")]
pub mod server;

pub use error::{Error, Result};
