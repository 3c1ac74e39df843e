// src/forms/mod.rs

//! Form definitions and submitted-data handling
//!
//! Forms are lists of [`FieldDef`] values. The recipe form additionally has
//! dynamically sized row lists (ingredients, instruction steps and tags)
//! that are rebuilt from indexed field names on every submission.

mod extract;
mod fields;
mod recipe;
mod rows;
mod social;

pub use extract::{
    IngredientRow, RecipeFields, combine_instruction_steps, extract_ingredients,
    extract_instruction_steps, extract_recipe_fields, extract_tags, instruction_steps_from_text,
    parse_ingredient_amount,
};
pub use fields::{
    FieldDef, FieldErrors, FormFields, Validator, styled, validate_field, validate_form,
};
pub use recipe::{
    IMAGE_MAX_LEN, INGREDIENT_REQUIRED, INSTRUCTION_REQUIRED, RecipeFormErrors, recipe_form,
    validate_recipe,
};
pub use rows::{FormRows, RowAction, RowKind, find_action};
pub use social::{NAME_MAX_LEN, USERNAME_MAX_LEN, comment_form, rating_form, sign_up_form};
