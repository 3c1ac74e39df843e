// src/db/models/ingredient.rs

//! Recipe ingredient model and the ingredient store

use crate::error::Result;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, Row, params};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Measurement unit of an ingredient amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Unit {
    #[serde(rename = "ml")]
    Millilitres,
    #[default]
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "L")]
    Litres,
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "oz")]
    Ounces,
}

impl Unit {
    /// Every unit, in the order the form offers them
    pub const ALL: [Unit; 5] = [
        Unit::Millilitres,
        Unit::Grams,
        Unit::Litres,
        Unit::Kilograms,
        Unit::Ounces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Millilitres => "ml",
            Unit::Grams => "g",
            Unit::Litres => "L",
            Unit::Kilograms => "kg",
            Unit::Ounces => "oz",
        }
    }

    /// Parse a submitted unit, falling back to grams for anything unknown
    pub fn parse_or_default(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ml" => Ok(Unit::Millilitres),
            "g" => Ok(Unit::Grams),
            "L" => Ok(Unit::Litres),
            "kg" => Ok(Unit::Kilograms),
            "oz" => Ok(Unit::Ounces),
            _ => Err(format!("Invalid unit: {}", s)),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Unit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Unit {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// One line item of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
    pub id: Option<i64>,
    pub recipe_id: i64,
    pub name: String,
    /// Always at least 1
    pub amount: i64,
    pub units: Unit,
}

impl RecipeIngredient {
    /// Create a new (unsaved) ingredient
    pub fn new(recipe_id: i64, name: String, amount: i64, units: Unit) -> Self {
        Self {
            id: None,
            recipe_id,
            name,
            amount,
            units,
        }
    }

    /// Insert this ingredient into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO recipe_ingredients (recipe_id, name, amount, units) VALUES (?1, ?2, ?3, ?4)",
            params![&self.recipe_id, &self.name, &self.amount, &self.units],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// All ingredients of a recipe in insertion order
    pub fn find_by_recipe(conn: &Connection, recipe_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, recipe_id, name, amount, units FROM recipe_ingredients
             WHERE recipe_id = ?1 ORDER BY id",
        )?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Replace every ingredient of `recipe_id` with `ingredients`
    ///
    /// Callers run this inside the same transaction as the recipe update.
    pub fn replace_for_recipe(
        conn: &Connection,
        recipe_id: i64,
        ingredients: &mut [RecipeIngredient],
    ) -> Result<()> {
        let removed = conn.execute(
            "DELETE FROM recipe_ingredients WHERE recipe_id = ?1",
            [recipe_id],
        )?;

        for ingredient in ingredients.iter_mut() {
            ingredient.recipe_id = recipe_id;
            ingredient.insert(conn)?;
        }

        debug!(
            "Replaced {} ingredients of recipe {} with {}",
            removed,
            recipe_id,
            ingredients.len()
        );
        Ok(())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            recipe_id: row.get(1)?,
            name: row.get(2)?,
            amount: row.get(3)?,
            units: row.get(4)?,
        })
    }
}

impl fmt::Display for RecipeIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", self.amount, self.units, self.name)
    }
}
