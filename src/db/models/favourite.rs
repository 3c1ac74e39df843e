// src/db/models/favourite.rs

//! Favourite model - a user's bookmarked recipes

use super::{Recipe, now_timestamp};
use crate::error::Result;
use rusqlite::{Connection, params};
use std::collections::HashSet;

/// Bookmark operations keyed by the unique (user, recipe) pair
pub struct Favourite;

impl Favourite {
    /// Bookmark a recipe. Returns true if it was not already a favourite.
    pub fn add(conn: &Connection, user_id: i64, recipe_id: i64) -> Result<bool> {
        let changed = conn.execute(
            "INSERT OR IGNORE INTO favourites (user_id, recipe_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, recipe_id, now_timestamp()],
        )?;
        Ok(changed == 1)
    }

    /// Remove a bookmark. Returns true if one existed.
    pub fn remove(conn: &Connection, user_id: i64, recipe_id: i64) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM favourites WHERE user_id = ?1 AND recipe_id = ?2",
            params![user_id, recipe_id],
        )?;
        Ok(changed > 0)
    }

    pub fn exists(conn: &Connection, user_id: i64, recipe_id: i64) -> Result<bool> {
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favourites WHERE user_id = ?1 AND recipe_id = ?2)",
            params![user_id, recipe_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// The user's favourite recipes, newest publication first
    pub fn recipes_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Recipe>> {
        let mut stmt = conn.prepare(
            "SELECT r.id, r.author_id, r.recipe_name, r.publication_date, r.difficulty,
                    r.description, r.instructions, r.image
             FROM recipes r JOIN favourites f ON f.recipe_id = r.id
             WHERE f.user_id = ?1
             ORDER BY r.publication_date DESC, r.id DESC",
        )?;
        let recipes = stmt
            .query_map([user_id], Recipe::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// IDs of the user's favourite recipes, for flagging listings
    pub fn recipe_ids_for_user(conn: &Connection, user_id: i64) -> Result<HashSet<i64>> {
        let mut stmt = conn.prepare("SELECT recipe_id FROM favourites WHERE user_id = ?1")?;
        let ids = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<std::result::Result<HashSet<i64>, _>>()?;
        Ok(ids)
    }

    pub fn count_for_user(conn: &Connection, user_id: i64) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM favourites WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
