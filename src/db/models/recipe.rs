// src/db/models/recipe.rs

//! Recipe model - a dish authored by one user

use super::{Rating, round_to, today};
use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use std::collections::HashSet;

const RECIPE_COLUMNS: &str =
    "id, author_id, recipe_name, publication_date, difficulty, description, instructions, image";

/// Lowest and highest difficulty a recipe may have
pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Maximum length of a recipe name
pub const RECIPE_NAME_MAX_LEN: usize = 255;

/// A recipe owned by one author
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: Option<i64>,
    pub author_id: i64,
    pub recipe_name: String,
    /// `YYYY-MM-DD`, set on insert
    pub publication_date: String,
    pub difficulty: i64,
    pub description: String,
    /// Newline-separated steps
    pub instructions: String,
    /// Path relative to the media directory
    pub image: Option<String>,
}

impl Recipe {
    /// Create a new (unsaved) recipe with difficulty 1 and no instructions
    pub fn new(author_id: i64, recipe_name: String, description: String) -> Self {
        Self {
            id: None,
            author_id,
            recipe_name,
            publication_date: today(),
            difficulty: 1,
            description,
            instructions: String::new(),
            image: None,
        }
    }

    /// Insert this recipe into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO recipes (author_id, recipe_name, publication_date, difficulty, description, instructions, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &self.author_id,
                &self.recipe_name,
                &self.publication_date,
                &self.difficulty,
                &self.description,
                &self.instructions,
                &self.image,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Write the editable fields back; author and publication date never change
    pub fn update(&self, conn: &Connection) -> Result<()> {
        let Some(id) = self.id else {
            return Err(crate::Error::NotFoundError(
                "cannot update a recipe that was never saved".to_string(),
            ));
        };

        conn.execute(
            "UPDATE recipes
             SET recipe_name = ?1, difficulty = ?2, description = ?3, instructions = ?4, image = ?5
             WHERE id = ?6",
            params![
                &self.recipe_name,
                &self.difficulty,
                &self.description,
                &self.instructions,
                &self.image,
                id,
            ],
        )?;
        Ok(())
    }

    /// Find a recipe by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let sql = format!("SELECT {} FROM recipes WHERE id = ?1", RECIPE_COLUMNS);
        let recipe = conn.query_row(&sql, [id], Self::from_row).optional()?;
        Ok(recipe)
    }

    /// List all recipes, newest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT {} FROM recipes ORDER BY publication_date DESC, id DESC",
            RECIPE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let recipes = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// Recipes written by `author_id`, newest first
    pub fn find_by_author(conn: &Connection, author_id: i64) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE author_id = ?1 ORDER BY publication_date DESC, id DESC",
            RECIPE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let recipes = stmt
            .query_map([author_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    /// IDs of recipes whose name, description, author names or ingredient
    /// names contain `text`
    ///
    /// `LIKE` ignores case for ASCII letters only; other text must match exactly.
    pub fn search_ids(conn: &Connection, text: &str) -> Result<HashSet<i64>> {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{}%", escaped);

        let mut stmt = conn.prepare(
            "SELECT DISTINCT r.id FROM recipes r
             JOIN users u ON u.id = r.author_id
             LEFT JOIN recipe_ingredients i ON i.recipe_id = r.id
             WHERE r.recipe_name LIKE ?1 ESCAPE '\\'
                OR r.description LIKE ?1 ESCAPE '\\'
                OR u.username LIKE ?1 ESCAPE '\\'
                OR u.first_name LIKE ?1 ESCAPE '\\'
                OR u.last_name LIKE ?1 ESCAPE '\\'
                OR i.name LIKE ?1 ESCAPE '\\'",
        )?;
        let ids = stmt
            .query_map([&pattern], |row| row.get(0))?
            .collect::<std::result::Result<HashSet<i64>, _>>()?;
        Ok(ids)
    }

    /// Delete a recipe by ID
    ///
    /// Ingredients, tag links, ratings, comments and favourites cascade.
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Mean of all ratings rounded to two decimals, or `None` if unrated
    pub fn average_rating(&self, conn: &Connection) -> Result<Option<f64>> {
        let Some(id) = self.id else {
            return Ok(None);
        };
        Ok(Rating::average_for_recipe(conn, id)?.map(|avg| round_to(avg, 2)))
    }

    /// Stored instructions split into display lines
    pub fn instruction_lines(&self) -> Vec<String> {
        self.instructions.lines().map(str::to_string).collect()
    }

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            author_id: row.get(1)?,
            recipe_name: row.get(2)?,
            publication_date: row.get(3)?,
            difficulty: row.get(4)?,
            description: row.get(5)?,
            instructions: row.get(6)?,
            image: row.get(7)?,
        })
    }
}
