// src/forms/extract.rs

//! Rebuild structured recipe rows from indexed form fields
//!
//! Row fields are numbered from zero (`ingredient_name_0`,
//! `ingredient_name_1`, ...). A scan stops at the first missing index, and an
//! empty scan yields one blank placeholder row so the form always has
//! something to edit.

use super::FormFields;
use crate::db::models::TagKind;
use serde::Serialize;

/// One ingredient line as submitted (raw text, not yet parsed)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngredientRow {
    /// Stored ingredient id, only carried by the edit form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub amount: String,
    pub units: String,
}

/// Top-level recipe fields as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeFields {
    pub recipe_name: String,
    pub difficulty: String,
    pub description: String,
    pub instructions: String,
    pub image: String,
}

impl RecipeFields {
    /// Submitted value of a top-level field by name
    pub fn value(&self, name: &str) -> &str {
        match name {
            "recipe_name" => &self.recipe_name,
            "difficulty" => &self.difficulty,
            "description" => &self.description,
            "instructions" => &self.instructions,
            "image" => &self.image,
            _ => "",
        }
    }
}

/// Collect `{prefix}_0`, `{prefix}_1`, ... until the first gap
fn scan(fields: &FormFields, prefix: &str) -> Vec<String> {
    (0..)
        .map_while(|i| fields.get(&format!("{}_{}", prefix, i)))
        .map(str::to_string)
        .collect()
}

fn or_placeholder<T: Default>(mut rows: Vec<T>) -> Vec<T> {
    if rows.is_empty() {
        rows.push(T::default());
    }
    rows
}

/// Ingredient rows keyed on `ingredient_name_{i}`
///
/// With `include_ids`, each row also carries `ingredient_id_{i}`.
pub fn extract_ingredients(fields: &FormFields, include_ids: bool) -> Vec<IngredientRow> {
    let rows = (0..)
        .map_while(|i| {
            let name = fields.get(&format!("ingredient_name_{}", i))?;
            Some(IngredientRow {
                id: include_ids.then(|| fields.value(&format!("ingredient_id_{}", i)).to_string()),
                name: name.to_string(),
                amount: fields.value(&format!("ingredient_amount_{}", i)).to_string(),
                units: fields.value(&format!("ingredient_units_{}", i)).to_string(),
            })
        })
        .collect();
    or_placeholder(rows)
}

pub fn extract_instruction_steps(fields: &FormFields) -> Vec<String> {
    or_placeholder(scan(fields, "instruction_step"))
}

/// Tag names from `cuisine_tag_{i}` or `dietary_tag_{i}`
pub fn extract_tags(fields: &FormFields, kind: TagKind) -> Vec<String> {
    or_placeholder(scan(fields, &format!("{}_tag", kind.as_str())))
}

pub fn extract_recipe_fields(fields: &FormFields) -> RecipeFields {
    RecipeFields {
        recipe_name: fields.value("recipe_name").to_string(),
        difficulty: fields.value("difficulty").to_string(),
        description: fields.value("description").to_string(),
        instructions: fields.value("instructions").to_string(),
        image: fields.value("image").to_string(),
    }
}

/// Whole-number amount; anything unusable becomes 1
pub fn parse_ingredient_amount(text: &str) -> i64 {
    match text.trim().parse::<i64>() {
        Ok(amount) if amount >= 1 => amount,
        _ => 1,
    }
}

/// Join non-blank trimmed steps with newlines
pub fn combine_instruction_steps<S: AsRef<str>>(steps: &[S]) -> String {
    steps
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split stored instructions back into editable steps
pub fn instruction_steps_from_text(text: &str) -> Vec<String> {
    or_placeholder(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_ingredients_gives_placeholder() {
        let fields = FormFields::from_pairs(&[("recipe_name", "Soup")]);
        assert_eq!(extract_ingredients(&fields, false), vec![IngredientRow::default()]);
    }

    #[test]
    fn test_ingredients_stop_at_first_gap() {
        let fields = FormFields::from_pairs(&[
            ("ingredient_name_0", "flour"),
            ("ingredient_amount_0", "200"),
            ("ingredient_units_0", "g"),
            ("ingredient_name_1", "milk"),
            ("ingredient_name_3", "lost"),
        ]);

        let rows = extract_ingredients(&fields, false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, "200");
        assert_eq!(rows[1].name, "milk");
        assert_eq!(rows[1].amount, "");
        assert_eq!(rows[1].units, "");
        assert!(rows[1].id.is_none());
    }

    #[test]
    fn test_ingredient_ids_on_edit() {
        let fields = FormFields::from_pairs(&[
            ("ingredient_id_0", "12"),
            ("ingredient_name_0", "flour"),
            ("ingredient_name_1", "salt"),
        ]);

        let rows = extract_ingredients(&fields, true);
        assert_eq!(rows[0].id.as_deref(), Some("12"));
        assert_eq!(rows[1].id.as_deref(), Some(""));
    }

    #[test]
    fn test_steps_and_tags() {
        let fields = FormFields::from_pairs(&[
            ("instruction_step_0", "Boil"),
            ("instruction_step_1", "Serve"),
            ("cuisine_tag_0", "Thai"),
        ]);

        assert_eq!(extract_instruction_steps(&fields), vec!["Boil", "Serve"]);
        assert_eq!(extract_tags(&fields, TagKind::Cuisine), vec!["Thai"]);
        assert_eq!(extract_tags(&fields, TagKind::Dietary), vec![""]);
    }

    #[test]
    fn test_recipe_fields_default_empty() {
        let fields = FormFields::from_pairs(&[("recipe_name", "Soup"), ("difficulty", "2")]);
        let recipe = extract_recipe_fields(&fields);
        assert_eq!(recipe.recipe_name, "Soup");
        assert_eq!(recipe.value("difficulty"), "2");
        assert_eq!(recipe.description, "");
        assert_eq!(recipe.image, "");
    }

    #[test]
    fn test_parse_ingredient_amount() {
        assert_eq!(parse_ingredient_amount("250"), 250);
        assert_eq!(parse_ingredient_amount(" 3 "), 3);
        assert_eq!(parse_ingredient_amount(""), 1);
        assert_eq!(parse_ingredient_amount("a pinch"), 1);
        assert_eq!(parse_ingredient_amount("2.5"), 1);
        assert_eq!(parse_ingredient_amount("0"), 1);
        assert_eq!(parse_ingredient_amount("-4"), 1);
    }

    #[test]
    fn test_combine_instruction_steps() {
        assert_eq!(combine_instruction_steps(&["  a  ", "", "b"]), "a\nb");
        assert_eq!(combine_instruction_steps(&["", "   "]), "");
    }

    #[test]
    fn test_instruction_steps_from_text() {
        assert_eq!(instruction_steps_from_text("a\n\n  b \r\n"), vec!["a", "b"]);
        assert_eq!(instruction_steps_from_text(""), vec![""]);
        assert_eq!(instruction_steps_from_text("\n \n"), vec![""]);
    }
}
