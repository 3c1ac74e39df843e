// src/cli/mod.rs
//! CLI definitions for Potluck
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "potluck")]
#[command(author = "Potluck Contributors")]
#[command(version)]
#[command(about = "Social recipe sharing server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and apply migrations
    Init {
        /// Path to the database file
        #[arg(short, long, default_value = "potluck.db")]
        db_path: String,
    },

    /// Run the HTTP server
    #[cfg(feature = "server")]
    Serve {
        /// Path to the database file (overrides the config file)
        #[arg(short, long)]
        db_path: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Address to listen on (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Fill the database with demonstration data
    Seed {
        /// Path to the database file
        #[arg(short, long, default_value = "potluck.db")]
        db_path: String,

        /// Total number of users, including the three fixture users
        #[arg(long, default_value_t = 200)]
        users: usize,

        /// Total number of recipes
        #[arg(long, default_value_t = 300)]
        recipes: usize,

        /// Random seed for a reproducible data set
        #[arg(long)]
        seed: Option<u64>,

        /// Do not show progress bars
        #[arg(short, long)]
        quiet: bool,
    },

    /// Remove all content and every non-staff user
    Unseed {
        /// Path to the database file
        #[arg(short, long, default_value = "potluck.db")]
        db_path: String,
    },
}
