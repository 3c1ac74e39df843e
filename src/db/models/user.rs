// src/db/models/user.rs

//! User model - registered accounts

use crate::error::{Error, Result};
use md5::{Digest, Md5};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

const USER_COLUMNS: &str = "id, username, first_name, last_name, email, is_staff, date_joined";

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Option<i64>,
    /// Unique handle, always starting with `@`
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Staff accounts survive `potluck unseed`
    pub is_staff: bool,
    pub date_joined: Option<String>,
}

impl User {
    /// Create a new (unsaved) user
    pub fn new(username: String, first_name: String, last_name: String, email: String) -> Self {
        Self {
            id: None,
            username,
            first_name,
            last_name,
            email,
            is_staff: false,
            date_joined: None,
        }
    }

    /// Insert this user into the database
    ///
    /// A taken username or email is reported as [`Error::AlreadyExists`].
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        let result = conn.execute(
            "INSERT INTO users (username, first_name, last_name, email, is_staff)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &self.username,
                &self.first_name,
                &self.last_name,
                &self.email,
                &self.is_staff,
            ],
        );

        match result {
            Ok(_) => {}
            Err(e) => {
                let err = Error::from(e);
                if err.is_unique_violation() {
                    return Err(Error::AlreadyExists(format!(
                        "user {} or email {}",
                        self.username, self.email
                    )));
                }
                return Err(err);
            }
        }

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a user by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = conn.query_row(&sql, [id], Self::from_row).optional()?;
        Ok(user)
    }

    /// Find a user by username (including the leading `@`)
    pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<Self>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS);
        let user = conn.query_row(&sql, [username], Self::from_row).optional()?;
        Ok(user)
    }

    /// Find a user by email address
    pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<Self>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let user = conn.query_row(&sql, [email], Self::from_row).optional()?;
        Ok(user)
    }

    /// List all users ordered by last name, then first name
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY last_name, first_name, id",
            USER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Count all users
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a user by ID (their recipes, ratings, comments, favourites
    /// and follows go with them)
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(())
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Gravatar image URL for this user's email
    pub fn gravatar(&self, size: u32) -> String {
        let normalized = self.email.trim().to_lowercase();
        let digest = Md5::digest(normalized.as_bytes());
        format!(
            "https://www.gravatar.com/avatar/{}?size={}&default=mp",
            hex::encode(digest),
            size
        )
    }

    /// Miniature gravatar used in lists
    pub fn mini_gravatar(&self) -> String {
        self.gravatar(60)
    }

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            username: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            email: row.get(4)?,
            is_staff: row.get(5)?,
            date_joined: row.get(6)?,
        })
    }
}
