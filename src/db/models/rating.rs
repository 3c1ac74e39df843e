// src/db/models/rating.rs

//! Rating model - one 1-5 score per (user, recipe)

use super::now_timestamp;
use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

/// Allowed star values
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// A user's rating of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub id: Option<i64>,
    pub user_id: i64,
    pub recipe_id: i64,
    pub rating: i64,
    pub created_at: String,
}

/// Whether [`Rating::submit`] created a row or changed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    Created,
    Updated,
}

impl RatingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingOutcome::Created => "submitted",
            RatingOutcome::Updated => "updated",
        }
    }
}

impl Rating {
    /// Record `value` as the user's rating of the recipe
    ///
    /// The (user, recipe) pair is unique: a second submission updates the
    /// stored score in place.
    pub fn submit(
        conn: &Connection,
        user_id: i64,
        recipe_id: i64,
        value: i64,
    ) -> Result<RatingOutcome> {
        if !RATING_RANGE.contains(&value) {
            return Err(Error::ParseError(format!(
                "rating must be between 1 and 5, got {}",
                value
            )));
        }

        let existed = Self::find_for_user(conn, user_id, recipe_id)?.is_some();

        conn.execute(
            "INSERT INTO ratings (user_id, recipe_id, rating, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, recipe_id) DO UPDATE SET rating = excluded.rating",
            params![user_id, recipe_id, value, now_timestamp()],
        )?;

        Ok(if existed {
            RatingOutcome::Updated
        } else {
            RatingOutcome::Created
        })
    }

    /// The rating `user_id` gave `recipe_id`, if any
    pub fn find_for_user(conn: &Connection, user_id: i64, recipe_id: i64) -> Result<Option<Self>> {
        let rating = conn
            .query_row(
                "SELECT id, user_id, recipe_id, rating, created_at FROM ratings
                 WHERE user_id = ?1 AND recipe_id = ?2",
                params![user_id, recipe_id],
                Self::from_row,
            )
            .optional()?;
        Ok(rating)
    }

    /// All ratings of a recipe, oldest first
    pub fn find_by_recipe(conn: &Connection, recipe_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, user_id, recipe_id, rating, created_at FROM ratings
             WHERE recipe_id = ?1 ORDER BY created_at, id",
        )?;
        let ratings = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ratings)
    }

    /// Unrounded mean score, or `None` when nobody rated the recipe
    pub fn average_for_recipe(conn: &Connection, recipe_id: i64) -> Result<Option<f64>> {
        let avg = conn.query_row(
            "SELECT AVG(rating) FROM ratings WHERE recipe_id = ?1",
            [recipe_id],
            |row| row.get::<_, Option<f64>>(0),
        )?;
        Ok(avg)
    }

    pub fn count_for_recipe(conn: &Connection, recipe_id: i64) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM ratings WHERE recipe_id = ?1",
            [recipe_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            user_id: row.get(1)?,
            recipe_id: row.get(2)?,
            rating: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}
