// src/editor.rs

//! Recipe create/edit form processing
//!
//! A POST to the recipe form is either a row action (add or delete a row,
//! shown again unsaved) or a save attempt. A save attempt validates every
//! error channel, and only a clean submission is written, in one
//! transaction covering the recipe, its ingredients and its tags.

use crate::db::models::{Recipe, RecipeIngredient, Tag, TagKind, Unit};
use crate::error::{Error, Result};
use crate::forms::{
    FieldDef, FormFields, FormRows, IngredientRow, RecipeFields, RecipeFormErrors,
    combine_instruction_steps, extract_recipe_fields, find_action, instruction_steps_from_text,
    parse_ingredient_amount, recipe_form, validate_recipe,
};
use rusqlite::Connection;
use serde::Serialize;
use std::str::FromStr;
use tracing::{info, warn};

pub const CREATE_TEMPLATE: &str = "create_recipes.html";
pub const EDIT_TEMPLATE: &str = "edit_recipe.html";

/// Hidden field carrying the phase of the form that was submitted
pub const PHASE_FIELD: &str = "form_phase";

/// Where a recipe form is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    /// Freshly shown, empty or pre-filled
    #[default]
    Initial,
    /// Rows were added or deleted, nothing saved
    DirtyUnsaved,
    /// A save attempt was rejected
    ValidationFailed,
    /// A save attempt succeeded
    Saved,
}

/// What happened to a submitted form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    RowAction,
    SaveFailed,
    SaveSucceeded,
}

impl FormPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormPhase::Initial => "initial",
            FormPhase::DirtyUnsaved => "dirty_unsaved",
            FormPhase::ValidationFailed => "validation_failed",
            FormPhase::Saved => "saved",
        }
    }

    /// Next phase after `event`; `Saved` never changes
    pub fn transition(self, event: FormEvent) -> FormPhase {
        match (self, event) {
            (FormPhase::Saved, _) => FormPhase::Saved,
            (_, FormEvent::RowAction) => FormPhase::DirtyUnsaved,
            (_, FormEvent::SaveFailed) => FormPhase::ValidationFailed,
            (_, FormEvent::SaveSucceeded) => FormPhase::Saved,
        }
    }
}

impl FromStr for FormPhase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "initial" => Ok(FormPhase::Initial),
            "dirty_unsaved" => Ok(FormPhase::DirtyUnsaved),
            "validation_failed" => Ok(FormPhase::ValidationFailed),
            "saved" => Ok(FormPhase::Saved),
            _ => Err(format!("Invalid form phase: {}", s)),
        }
    }
}

/// Everything the recipe form template needs
#[derive(Debug, Clone, Serialize)]
pub struct RecipeFormView {
    pub template: &'static str,
    pub phase: FormPhase,
    /// Set on the edit form
    pub recipe_id: Option<i64>,
    pub form: Vec<FieldDef>,
    pub values: RecipeFields,
    #[serde(flatten)]
    pub rows: FormRows,
    #[serde(flatten)]
    pub errors: RecipeFormErrors,
    pub units: Vec<&'static str>,
}

impl RecipeFormView {
    fn new(recipe_id: Option<i64>, phase: FormPhase, values: RecipeFields, rows: FormRows) -> Self {
        Self {
            template: if recipe_id.is_some() {
                EDIT_TEMPLATE
            } else {
                CREATE_TEMPLATE
            },
            phase,
            recipe_id,
            form: recipe_form(),
            values,
            rows,
            errors: RecipeFormErrors::default(),
            units: Unit::ALL.iter().map(Unit::as_str).collect(),
        }
    }
}

/// Result of processing a recipe form submission
#[derive(Debug, Clone)]
pub enum EditorOutcome {
    /// Show the form again (row action or validation failure)
    Render(Box<RecipeFormView>),
    /// The recipe was written; send the client to `redirect`
    Saved { recipe_id: i64, redirect: String },
}

/// The empty create form
pub fn initial_create_view() -> RecipeFormView {
    RecipeFormView::new(None, FormPhase::Initial, RecipeFields::default(), FormRows::default())
}

/// The edit form pre-filled from the stored recipe
pub fn initial_edit_view(conn: &Connection, recipe: &Recipe) -> Result<RecipeFormView> {
    let recipe_id = saved_id(recipe)?;

    let values = RecipeFields {
        recipe_name: recipe.recipe_name.clone(),
        difficulty: recipe.difficulty.to_string(),
        description: recipe.description.clone(),
        instructions: recipe.instructions.clone(),
        image: recipe.image.clone().unwrap_or_default(),
    };

    let mut ingredients: Vec<IngredientRow> = RecipeIngredient::find_by_recipe(conn, recipe_id)?
        .into_iter()
        .map(|ing| IngredientRow {
            id: ing.id.map(|id| id.to_string()),
            name: ing.name,
            amount: ing.amount.to_string(),
            units: ing.units.as_str().to_string(),
        })
        .collect();
    if ingredients.is_empty() {
        ingredients.push(IngredientRow::default());
    }

    let rows = FormRows {
        ingredients,
        instructions: instruction_steps_from_text(&recipe.instructions),
        cuisine_tags: tag_names(conn, TagKind::Cuisine, recipe_id)?,
        dietary_tags: tag_names(conn, TagKind::Dietary, recipe_id)?,
    };

    Ok(RecipeFormView::new(Some(recipe_id), FormPhase::Initial, values, rows))
}

fn tag_names(conn: &Connection, kind: TagKind, recipe_id: i64) -> Result<Vec<String>> {
    let mut names: Vec<String> = Tag::find_by_recipe(conn, kind, recipe_id)?
        .into_iter()
        .map(|t| t.name)
        .collect();
    if names.is_empty() {
        names.push(String::new());
    }
    Ok(names)
}

/// Handle a POST of the create (`existing` is `None`) or edit form
///
/// Only the recipe's author may submit the edit form.
pub fn process_submission(
    conn: &mut Connection,
    author_id: i64,
    existing: Option<&Recipe>,
    fields: &FormFields,
) -> Result<EditorOutcome> {
    if let Some(recipe) = existing {
        ensure_author(recipe, author_id)?;
    }
    let recipe_id = existing.map(saved_id).transpose()?;

    let prior: FormPhase = fields
        .get(PHASE_FIELD)
        .and_then(|p| p.parse().ok())
        .unwrap_or_default();
    let values = extract_recipe_fields(fields);
    let mut rows = FormRows::extract(fields, existing.is_some());

    if let Some(action) = find_action(fields) {
        rows.apply(action);
        let phase = prior.transition(FormEvent::RowAction);
        return Ok(EditorOutcome::Render(Box::new(RecipeFormView::new(
            recipe_id, phase, values, rows,
        ))));
    }

    let errors = validate_recipe(&values, &rows);
    if !errors.is_empty() {
        warn!(
            "Recipe form rejected ({} field errors, ingredient error: {}, instruction error: {})",
            errors.fields.len(),
            errors.ingredient_error.is_some(),
            errors.instruction_error.is_some()
        );
        let phase = prior.transition(FormEvent::SaveFailed);
        let mut view = RecipeFormView::new(recipe_id, phase, values, rows);
        view.errors = errors;
        return Ok(EditorOutcome::Render(Box::new(view)));
    }

    let saved = save_recipe(conn, author_id, existing, &values, &rows)?;
    let redirect = if existing.is_some() {
        format!("/recipes/{}/", saved)
    } else {
        "/".to_string()
    };
    Ok(EditorOutcome::Saved {
        recipe_id: saved,
        redirect,
    })
}

/// Write a validated recipe with its ingredients and tags
///
/// Blank ingredient names and tag names are skipped, unknown units become
/// grams, and repeated tag names link once. Nothing is written unless every
/// step succeeds.
pub fn save_recipe(
    conn: &mut Connection,
    author_id: i64,
    existing: Option<&Recipe>,
    values: &RecipeFields,
    rows: &FormRows,
) -> Result<i64> {
    let difficulty: i64 = values.difficulty.trim().parse().map_err(|_| {
        Error::ParseError(format!("Invalid difficulty: {}", values.difficulty))
    })?;
    let image = match values.image.trim() {
        "" => existing.and_then(|r| r.image.clone()),
        path => Some(path.to_string()),
    };

    let recipe_id = crate::db::transaction(conn, |tx| {
        let recipe_id = match existing {
            Some(current) => {
                let mut recipe = current.clone();
                recipe.recipe_name = values.recipe_name.trim().to_string();
                recipe.difficulty = difficulty;
                recipe.description = values.description.trim().to_string();
                recipe.instructions = combine_instruction_steps(&rows.instructions);
                recipe.image = image;
                recipe.update(tx)?;
                saved_id(&recipe)?
            }
            None => {
                let mut recipe = Recipe::new(
                    author_id,
                    values.recipe_name.trim().to_string(),
                    values.description.trim().to_string(),
                );
                recipe.difficulty = difficulty;
                recipe.instructions = combine_instruction_steps(&rows.instructions);
                recipe.image = image;
                recipe.insert(tx)?
            }
        };

        let mut ingredients: Vec<RecipeIngredient> = rows
            .ingredients
            .iter()
            .filter(|row| !row.name.trim().is_empty())
            .map(|row| {
                RecipeIngredient::new(
                    recipe_id,
                    row.name.trim().to_string(),
                    parse_ingredient_amount(&row.amount),
                    Unit::parse_or_default(&row.units),
                )
            })
            .collect();
        RecipeIngredient::replace_for_recipe(tx, recipe_id, &mut ingredients)?;

        for (kind, names) in [
            (TagKind::Cuisine, &rows.cuisine_tags),
            (TagKind::Dietary, &rows.dietary_tags),
        ] {
            let mut tag_ids = Vec::new();
            for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
                let tag = Tag::get_or_create(tx, kind, name)?;
                if !tag_ids.contains(&tag.id) {
                    tag_ids.push(tag.id);
                }
            }
            Tag::set_for_recipe(tx, kind, recipe_id, &tag_ids)?;
        }

        Ok(recipe_id)
    })?;

    info!(
        "{} recipe {} by user {}",
        if existing.is_some() { "Updated" } else { "Created" },
        recipe_id,
        author_id
    );
    Ok(recipe_id)
}

/// Delete a recipe on behalf of its author
pub fn delete_recipe(conn: &Connection, viewer_id: i64, recipe_id: i64) -> Result<()> {
    let recipe = Recipe::find_by_id(conn, recipe_id)?
        .ok_or_else(|| Error::NotFoundError(format!("Recipe {} not found", recipe_id)))?;
    ensure_author(&recipe, viewer_id)?;

    Recipe::delete(conn, recipe_id)?;
    info!("Deleted recipe {} ({})", recipe_id, recipe.recipe_name);
    Ok(())
}

/// Fail with [`Error::Forbidden`] unless `user_id` wrote the recipe
pub fn ensure_author(recipe: &Recipe, user_id: i64) -> Result<()> {
    if recipe.author_id != user_id {
        warn!(
            "User {} is not the author of recipe {:?}",
            user_id, recipe.id
        );
        return Err(Error::Forbidden(
            "Only the recipe's author can do that".to_string(),
        ));
    }
    Ok(())
}

fn saved_id(recipe: &Recipe) -> Result<i64> {
    recipe
        .id
        .ok_or_else(|| Error::NotFoundError("Recipe has not been saved".to_string()))
}
