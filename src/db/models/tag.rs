// src/db/models/tag.rs

//! Cuisine and dietary tags - shared, name-keyed labels on recipes

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Which tag family a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Cuisine,
    Dietary,
}

impl TagKind {
    pub const ALL: [TagKind; 2] = [TagKind::Cuisine, TagKind::Dietary];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Cuisine => "cuisine",
            TagKind::Dietary => "dietary",
        }
    }

    fn table(&self) -> &'static str {
        match self {
            TagKind::Cuisine => "cuisine_tags",
            TagKind::Dietary => "dietary_tags",
        }
    }

    fn link_table(&self) -> &'static str {
        match self {
            TagKind::Cuisine => "recipe_cuisine_tags",
            TagKind::Dietary => "recipe_dietary_tags",
        }
    }
}

impl FromStr for TagKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cuisine" => Ok(TagKind::Cuisine),
            "dietary" => Ok(TagKind::Dietary),
            _ => Err(format!("Invalid tag kind: {}", s)),
        }
    }
}

/// A cuisine or dietary tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub kind: TagKind,
    pub name: String,
}

impl Tag {
    /// Return the tag called `name`, creating it if needed
    pub fn get_or_create(conn: &Connection, kind: TagKind, name: &str) -> Result<Self> {
        let sql = format!("INSERT OR IGNORE INTO {} (name) VALUES (?1)", kind.table());
        conn.execute(&sql, [name])?;

        let sql = format!("SELECT id, name FROM {} WHERE name = ?1", kind.table());
        let tag = conn.query_row(&sql, [name], |row| {
            Ok(Self {
                id: row.get(0)?,
                kind,
                name: row.get(1)?,
            })
        })?;
        Ok(tag)
    }

    /// Exact-name lookup
    pub fn find_by_name(conn: &Connection, kind: TagKind, name: &str) -> Result<Option<Self>> {
        let sql = format!("SELECT id, name FROM {} WHERE name = ?1", kind.table());
        let tag = conn
            .query_row(&sql, [name], |row| {
                Ok(Self {
                    id: row.get(0)?,
                    kind,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(tag)
    }

    /// All tags of a kind, ordered by name
    pub fn list_all(conn: &Connection, kind: TagKind) -> Result<Vec<Self>> {
        let sql = format!("SELECT id, name FROM {} ORDER BY name", kind.table());
        Self::query(conn, kind, &sql, params![])
    }

    /// Tags of a kind attached to a recipe, ordered by name
    pub fn find_by_recipe(conn: &Connection, kind: TagKind, recipe_id: i64) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT t.id, t.name FROM {} t JOIN {} l ON l.tag_id = t.id
             WHERE l.recipe_id = ?1 ORDER BY t.name",
            kind.table(),
            kind.link_table()
        );
        Self::query(conn, kind, &sql, params![recipe_id])
    }

    /// Tags whose name matches any of `names`, ignoring case and surrounding space
    pub fn find_matching_names(
        conn: &Connection,
        kind: TagKind,
        names: &[String],
    ) -> Result<Vec<Self>> {
        let wanted: HashSet<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
        let tags = Self::list_all(conn, kind)?
            .into_iter()
            .filter(|tag| wanted.contains(&tag.name.to_lowercase()))
            .collect();
        Ok(tags)
    }

    /// Set a recipe's tags of `kind` to exactly `tag_ids`
    pub fn set_for_recipe(
        conn: &Connection,
        kind: TagKind,
        recipe_id: i64,
        tag_ids: &[i64],
    ) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE recipe_id = ?1", kind.link_table());
        conn.execute(&sql, [recipe_id])?;

        let sql = format!(
            "INSERT OR IGNORE INTO {} (recipe_id, tag_id) VALUES (?1, ?2)",
            kind.link_table()
        );
        let mut stmt = conn.prepare(&sql)?;
        for tag_id in tag_ids {
            stmt.execute(params![recipe_id, tag_id])?;
        }
        Ok(())
    }

    /// IDs of recipes carrying at least one of `tag_ids`
    pub fn recipe_ids_with_any(
        conn: &Connection,
        kind: TagKind,
        tag_ids: &[i64],
    ) -> Result<HashSet<i64>> {
        let sql = format!(
            "SELECT DISTINCT recipe_id FROM {} WHERE tag_id = ?1",
            kind.link_table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut ids = HashSet::new();
        for tag_id in tag_ids {
            for id in stmt.query_map([tag_id], |row| row.get::<_, i64>(0))? {
                ids.insert(id?);
            }
        }
        Ok(ids)
    }

    /// Delete every tag of a kind (links cascade)
    pub fn delete_all(conn: &Connection, kind: TagKind) -> Result<usize> {
        let sql = format!("DELETE FROM {}", kind.table());
        Ok(conn.execute(&sql, [])?)
    }

    fn query(
        conn: &Connection,
        kind: TagKind,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(sql)?;
        let tags = stmt
            .query_map(params, |row| {
                Ok(Self {
                    id: row.get(0)?,
                    kind,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
