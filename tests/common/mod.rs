// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use potluck::db;
use potluck::db::models::{Recipe, RecipeIngredient, Unit, User};
use potluck::forms::FormFields;
use rusqlite::Connection;
use tempfile::TempDir;

/// Create an initialized, empty database.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_test_db() -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("potluck.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    (temp_dir, db_path)
}

/// Insert a user named `@{name}` with an example.org address.
pub fn create_user(conn: &Connection, name: &str) -> User {
    let mut first = name.to_string();
    if let Some(c) = first.get_mut(0..1) {
        c.make_ascii_uppercase();
    }
    let mut user = User::new(
        format!("@{}", name),
        first,
        "Tester".to_string(),
        format!("{}@example.org", name),
    );
    user.insert(conn).unwrap();
    user
}

/// Insert a recipe with one ingredient and two steps.
pub fn create_recipe(conn: &Connection, author: &User, name: &str) -> i64 {
    let mut recipe = Recipe::new(
        author.id.unwrap(),
        name.to_string(),
        format!("A simple {}", name.to_lowercase()),
    );
    recipe.difficulty = 2;
    recipe.instructions = "Chop\nCook".to_string();
    let recipe_id = recipe.insert(conn).unwrap();

    let mut ingredients = vec![RecipeIngredient::new(
        recipe_id,
        "Flour".to_string(),
        200,
        Unit::Grams,
    )];
    RecipeIngredient::replace_for_recipe(conn, recipe_id, &mut ingredients).unwrap();
    recipe_id
}

/// A complete, valid recipe form submission.
pub fn valid_recipe_form(name: &str) -> Vec<(String, String)> {
    [
        ("recipe_name", name),
        ("difficulty", "3"),
        ("description", "Weeknight dinner"),
        ("image", ""),
        ("ingredient_name_0", "Rice"),
        ("ingredient_amount_0", "150"),
        ("ingredient_units_0", "g"),
        ("instruction_step_0", "Rinse the rice"),
        ("instruction_step_1", "Simmer for 12 minutes"),
        ("cuisine_tag_0", "Thai"),
        ("dietary_tag_0", "Vegan"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn fields(pairs: &[(&str, &str)]) -> FormFields {
    FormFields::from_pairs(pairs)
}

/// Number of rows in `table`.
pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
