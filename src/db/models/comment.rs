// src/db/models/comment.rs

//! Comment model - free-text remarks on a recipe

use super::now_timestamp;
use crate::error::Result;
use rusqlite::{Connection, Row, params};
use serde::Serialize;

/// A comment left on a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: Option<i64>,
    pub recipe_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: Option<String>,
}

impl Comment {
    pub fn new(recipe_id: i64, author_id: i64, text: String) -> Self {
        Self {
            id: None,
            recipe_id,
            author_id,
            text,
            created_at: None,
        }
    }

    /// Insert this comment, stamping it with the current time
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        let created_at = self.created_at.clone().unwrap_or_else(now_timestamp);
        conn.execute(
            "INSERT INTO comments (recipe_id, author_id, text, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![&self.recipe_id, &self.author_id, &self.text, &created_at],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        self.created_at = Some(created_at);
        Ok(id)
    }

    /// Comments on a recipe, newest first (ties broken by newest id)
    pub fn find_by_recipe(conn: &Connection, recipe_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, recipe_id, author_id, text, created_at FROM comments
             WHERE recipe_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let comments = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(comments)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
        Ok(())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            recipe_id: row.get(1)?,
            author_id: row.get(2)?,
            text: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}
