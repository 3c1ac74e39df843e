// src/forms/recipe.rs

//! The recipe create/edit form and its validation

use super::extract::RecipeFields;
use super::fields::{FieldDef, FieldErrors, styled, validate_field};
use super::rows::FormRows;
use crate::db::models::{DIFFICULTY_RANGE, RECIPE_NAME_MAX_LEN};
use serde::Serialize;

pub const INGREDIENT_REQUIRED: &str = "At least one ingredient is required.";
pub const INSTRUCTION_REQUIRED: &str = "At least one instruction is required.";

/// Maximum length of a stored image reference
pub const IMAGE_MAX_LEN: usize = 255;

/// Top-level recipe fields
///
/// Instructions are entered as step rows, so they have no definition here.
pub fn recipe_form() -> Vec<FieldDef> {
    vec![
        styled(
            FieldDef::new("recipe_name", "Recipe name")
                .placeholder("Enter recipe name")
                .required()
                .max_len(RECIPE_NAME_MAX_LEN),
        ),
        styled(
            FieldDef::new("difficulty", "Difficulty")
                .required()
                .int_range(*DIFFICULTY_RANGE.start(), *DIFFICULTY_RANGE.end()),
        ),
        styled(
            FieldDef::new("description", "Description")
                .placeholder("Describe your recipe...")
                .attr("rows", "4")
                .required(),
        ),
        FieldDef::new("image", "Image").max_len(IMAGE_MAX_LEN),
    ]
}

/// Every error channel of a failed recipe save
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeFormErrors {
    pub fields: FieldErrors,
    pub ingredient_error: Option<String>,
    pub instruction_error: Option<String>,
}

impl RecipeFormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.ingredient_error.is_none() && self.instruction_error.is_none()
    }
}

/// Check the top-level fields and require one named ingredient and one step
///
/// All three channels are evaluated independently.
pub fn validate_recipe(fields: &RecipeFields, rows: &FormRows) -> RecipeFormErrors {
    let mut errors = RecipeFormErrors::default();

    for def in recipe_form() {
        let found = validate_field(&def, fields.value(def.name));
        if !found.is_empty() {
            errors.fields.insert(def.name.to_string(), found);
        }
    }

    if !rows.ingredients.iter().any(|row| !row.name.trim().is_empty()) {
        errors.ingredient_error = Some(INGREDIENT_REQUIRED.to_string());
    }
    if !rows.instructions.iter().any(|step| !step.trim().is_empty()) {
        errors.instruction_error = Some(INSTRUCTION_REQUIRED.to_string());
    }

    errors
}
