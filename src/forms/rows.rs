// src/forms/rows.rs

//! In-memory add/delete row actions on the recipe form
//!
//! A submission may carry one button key such as `add_ingredient` or
//! `delete_instruction_2`. Applying it edits the row lists only; nothing is
//! persisted and the form is shown again.

use super::extract::{
    IngredientRow, extract_ingredients, extract_instruction_steps, extract_tags,
};
use super::FormFields;
use crate::db::models::TagKind;
use serde::Serialize;
use std::fmt;

/// A dynamically sized list on the recipe form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Ingredient,
    Instruction,
    CuisineTag,
    DietaryTag,
}

impl RowKind {
    /// Scan order when looking for an action
    pub const ALL: [RowKind; 4] = [
        RowKind::Ingredient,
        RowKind::Instruction,
        RowKind::CuisineTag,
        RowKind::DietaryTag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Ingredient => "ingredient",
            RowKind::Instruction => "instruction",
            RowKind::CuisineTag => "cuisine_tag",
            RowKind::DietaryTag => "dietary_tag",
        }
    }

    pub fn add_key(&self) -> String {
        format!("add_{}", self.as_str())
    }

    pub fn delete_prefix(&self) -> String {
        format!("delete_{}_", self.as_str())
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single row action honoured for a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Add(RowKind),
    Delete(RowKind, usize),
}

/// Find the row action in a submission, if any
///
/// Deletes are checked before adds, each in [`RowKind::ALL`] order. Within a
/// kind the first key in submission order wins. Delete keys whose suffix is
/// not an index are skipped.
pub fn find_action(fields: &FormFields) -> Option<RowAction> {
    for kind in RowKind::ALL {
        let prefix = kind.delete_prefix();
        let found = fields.keys().find_map(|key| {
            key.strip_prefix(prefix.as_str())
                .and_then(|suffix| suffix.parse::<usize>().ok())
        });
        if let Some(index) = found {
            return Some(RowAction::Delete(kind, index));
        }
    }

    RowKind::ALL
        .into_iter()
        .find(|kind| fields.contains(&kind.add_key()))
        .map(RowAction::Add)
}

/// All row lists of the recipe form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRows {
    pub ingredients: Vec<IngredientRow>,
    pub instructions: Vec<String>,
    pub cuisine_tags: Vec<String>,
    pub dietary_tags: Vec<String>,
}

impl Default for FormRows {
    /// One placeholder row in every list
    fn default() -> Self {
        Self {
            ingredients: vec![IngredientRow::default()],
            instructions: vec![String::new()],
            cuisine_tags: vec![String::new()],
            dietary_tags: vec![String::new()],
        }
    }
}

impl FormRows {
    pub fn extract(fields: &FormFields, include_ids: bool) -> Self {
        Self {
            ingredients: extract_ingredients(fields, include_ids),
            instructions: extract_instruction_steps(fields),
            cuisine_tags: extract_tags(fields, TagKind::Cuisine),
            dietary_tags: extract_tags(fields, TagKind::Dietary),
        }
    }

    /// Apply an add or delete, keeping at least one row in the list
    pub fn apply(&mut self, action: RowAction) {
        let kind = match action {
            RowAction::Add(kind) | RowAction::Delete(kind, _) => kind,
        };
        tracing::debug!("Row action {:?} on {}", action, kind);

        match kind {
            RowKind::Ingredient => edit_list(&mut self.ingredients, action),
            RowKind::Instruction => edit_list(&mut self.instructions, action),
            RowKind::CuisineTag => edit_list(&mut self.cuisine_tags, action),
            RowKind::DietaryTag => edit_list(&mut self.dietary_tags, action),
        }
    }
}

fn edit_list<T: Default>(rows: &mut Vec<T>, action: RowAction) {
    match action {
        RowAction::Add(_) => rows.push(T::default()),
        RowAction::Delete(_, index) => {
            if index < rows.len() {
                rows.remove(index);
            }
        }
    }
    if rows.is_empty() {
        rows.push(T::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_action() {
        let fields = FormFields::from_pairs(&[("recipe_name", "Soup"), ("save", "")]);
        assert_eq!(find_action(&fields), None);
    }

    #[test]
    fn test_delete_beats_add() {
        let fields = FormFields::from_pairs(&[("add_ingredient", ""), ("delete_dietary_tag_0", "")]);
        assert_eq!(
            find_action(&fields),
            Some(RowAction::Delete(RowKind::DietaryTag, 0))
        );
    }

    #[test]
    fn test_kind_order_among_adds() {
        let fields = FormFields::from_pairs(&[("add_cuisine_tag", ""), ("add_instruction", "")]);
        assert_eq!(find_action(&fields), Some(RowAction::Add(RowKind::Instruction)));
    }

    #[test]
    fn test_first_delete_key_in_submission_order() {
        let fields = FormFields::from_pairs(&[
            ("delete_ingredient_2", ""),
            ("delete_ingredient_0", ""),
        ]);
        assert_eq!(
            find_action(&fields),
            Some(RowAction::Delete(RowKind::Ingredient, 2))
        );
    }

    #[test]
    fn test_malformed_delete_ignored() {
        let fields = FormFields::from_pairs(&[
            ("delete_ingredient_x", ""),
            ("delete_instruction_-1", ""),
            ("add_dietary_tag", ""),
        ]);
        assert_eq!(find_action(&fields), Some(RowAction::Add(RowKind::DietaryTag)));
    }

    #[test]
    fn test_add_appends_blank_row() {
        let mut rows = FormRows::default();
        rows.instructions = vec!["Boil".to_string()];
        rows.apply(RowAction::Add(RowKind::Instruction));
        assert_eq!(rows.instructions, vec!["Boil", ""]);
    }

    #[test]
    fn test_delete_in_bounds() {
        let mut rows = FormRows::default();
        rows.cuisine_tags = vec!["Thai".to_string(), "Greek".to_string()];
        rows.apply(RowAction::Delete(RowKind::CuisineTag, 0));
        assert_eq!(rows.cuisine_tags, vec!["Greek"]);
    }

    #[test]
    fn test_delete_out_of_bounds_is_noop() {
        let mut rows = FormRows::default();
        rows.dietary_tags = vec!["Vegan".to_string()];
        let before = rows.clone();
        rows.apply(RowAction::Delete(RowKind::DietaryTag, 5));
        assert_eq!(rows, before);
    }

    #[test]
    fn test_delete_last_row_leaves_placeholder() {
        for kind in RowKind::ALL {
            let mut rows = FormRows::default();
            rows.ingredients[0].name = "flour".to_string();
            rows.instructions[0] = "Mix".to_string();
            rows.cuisine_tags[0] = "Thai".to_string();
            rows.dietary_tags[0] = "Vegan".to_string();

            rows.apply(RowAction::Delete(kind, 0));

            match kind {
                RowKind::Ingredient => assert_eq!(rows.ingredients, vec![IngredientRow::default()]),
                RowKind::Instruction => assert_eq!(rows.instructions, vec![""]),
                RowKind::CuisineTag => assert_eq!(rows.cuisine_tags, vec![""]),
                RowKind::DietaryTag => assert_eq!(rows.dietary_tags, vec![""]),
            }
        }
    }
}
