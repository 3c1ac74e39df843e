// src/commands/demo.rs

//! Demo data commands

use anyhow::{Context, Result};
use potluck::demo::{self, DemoData};
use potluck::progress::{CliProgress, ProgressTracker, SilentProgress};

/// Fill the database with demonstration data
pub fn cmd_seed(
    db_path: &str,
    users: usize,
    recipes: usize,
    seed: Option<u64>,
    quiet: bool,
) -> Result<()> {
    let mut conn = potluck::db::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path))?;

    let mut builder = DemoData::new().users(users).recipes(recipes);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }

    let progress: Box<dyn ProgressTracker> = if quiet {
        Box::new(SilentProgress::new())
    } else {
        Box::new(CliProgress::new())
    };
    let summary = builder.run(&mut conn, progress.as_ref())?;

    println!("Seeded demo data:");
    println!("  Users:       {}", summary.users);
    println!("  Recipes:     {}", summary.recipes);
    println!("  Ingredients: {}", summary.ingredients);
    println!("  Comments:    {}", summary.comments);
    println!("  Ratings:     {}", summary.ratings);
    println!("  Follows:     {}", summary.follows);
    println!("  Favourites:  {}", summary.favourites);
    Ok(())
}

/// Remove all content and every non-staff user
pub fn cmd_unseed(db_path: &str) -> Result<()> {
    let mut conn = potluck::db::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path))?;

    let summary = demo::unseed(&mut conn)?;

    println!("Removed:");
    println!("  {} recipes ({} ingredients)", summary.recipes, summary.ingredients);
    println!("  {} comments, {} ratings", summary.comments, summary.ratings);
    println!("  {} follows, {} favourites", summary.follows, summary.favourites);
    println!("  {} tags, {} users", summary.tags, summary.users);
    Ok(())
}
