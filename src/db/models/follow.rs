// src/db/models/follow.rs

//! Follow model - directed follower/following pairs between users

use super::User;
use crate::error::Result;
use rusqlite::{Connection, Row, params};

/// A directed "follower follows following" relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    pub id: Option<i64>,
    pub follower_id: i64,
    pub following_id: i64,
}

impl Follow {
    /// Follow `following_id`, creating the pair if it does not exist
    ///
    /// Following yourself is a no-op. Returns true if a new pair was created.
    pub fn follow(conn: &Connection, follower_id: i64, following_id: i64) -> Result<bool> {
        if follower_id == following_id {
            return Ok(false);
        }

        let changed = conn.execute(
            "INSERT OR IGNORE INTO follows (follower_id, following_id) VALUES (?1, ?2)",
            params![follower_id, following_id],
        )?;
        Ok(changed == 1)
    }

    /// Remove the pair. Returns true if a pair existed.
    pub fn unfollow(conn: &Connection, follower_id: i64, following_id: i64) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM follows WHERE follower_id = ?1 AND following_id = ?2",
            params![follower_id, following_id],
        )?;
        Ok(changed > 0)
    }

    pub fn is_following(conn: &Connection, follower_id: i64, following_id: i64) -> Result<bool> {
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND following_id = ?2)",
            params![follower_id, following_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Users who follow `user_id`
    pub fn followers(conn: &Connection, user_id: i64) -> Result<Vec<User>> {
        Self::users_where(
            conn,
            "SELECT u.id, u.username, u.first_name, u.last_name, u.email, u.is_staff, u.date_joined
             FROM users u JOIN follows f ON f.follower_id = u.id
             WHERE f.following_id = ?1
             ORDER BY u.last_name, u.first_name, u.id",
            user_id,
        )
    }

    /// Users that `user_id` follows
    pub fn following(conn: &Connection, user_id: i64) -> Result<Vec<User>> {
        Self::users_where(
            conn,
            "SELECT u.id, u.username, u.first_name, u.last_name, u.email, u.is_staff, u.date_joined
             FROM users u JOIN follows f ON f.following_id = u.id
             WHERE f.follower_id = ?1
             ORDER BY u.last_name, u.first_name, u.id",
            user_id,
        )
    }

    pub fn followers_count(conn: &Connection, user_id: i64) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE following_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn following_count(conn: &Connection, user_id: i64) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// All pairs, newest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, follower_id, following_id FROM follows ORDER BY id DESC")?;
        let follows = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(follows)
    }

    fn users_where(conn: &Connection, sql: &str, user_id: i64) -> Result<Vec<User>> {
        let mut stmt = conn.prepare(sql)?;
        let users = stmt
            .query_map([user_id], User::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            follower_id: row.get(1)?,
            following_id: row.get(2)?,
        })
    }
}
