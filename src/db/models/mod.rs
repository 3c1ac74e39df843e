// src/db/models/mod.rs

//! Data models for Potluck database entities
//!
//! This module defines Rust structs that correspond to database tables
//! and provides methods for creating, reading, updating, and deleting records.

mod comment;
mod favourite;
mod follow;
mod ingredient;
mod rating;
mod recipe;
mod tag;
mod user;

pub use comment::Comment;
pub use favourite::Favourite;
pub use follow::Follow;
pub use ingredient::{RecipeIngredient, Unit};
pub use rating::{RATING_RANGE, Rating, RatingOutcome};
pub use recipe::{DIFFICULTY_RANGE, RECIPE_NAME_MAX_LEN, Recipe};
pub use tag::{Tag, TagKind};
pub use user::User;

/// Current UTC time with microseconds, so rows sort in creation order
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

/// Today's date as `YYYY-MM-DD`
pub(crate) fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
