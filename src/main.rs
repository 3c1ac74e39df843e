// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { db_path }) => commands::cmd_init(&db_path),

        #[cfg(feature = "server")]
        Some(Commands::Serve {
            db_path,
            config,
            bind,
        }) => commands::cmd_serve(db_path.as_deref(), config.as_deref(), bind.as_deref()),

        Some(Commands::Seed {
            db_path,
            users,
            recipes,
            seed,
            quiet,
        }) => commands::cmd_seed(&db_path, users, recipes, seed, quiet),

        Some(Commands::Unseed { db_path }) => commands::cmd_unseed(&db_path),

        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
