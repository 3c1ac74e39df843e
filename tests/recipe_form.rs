// tests/recipe_form.rs

//! Recipe create/edit form tests: row actions, validation and persistence.

mod common;

use common::{count_rows, create_recipe, create_user, setup_test_db, valid_recipe_form};
use potluck::db;
use potluck::db::models::{Recipe, RecipeIngredient, Tag, TagKind, Unit};
use potluck::editor::{self, EditorOutcome, FormPhase};
use potluck::forms::{FormFields, INGREDIENT_REQUIRED, INSTRUCTION_REQUIRED};

fn render(outcome: EditorOutcome) -> potluck::editor::RecipeFormView {
    match outcome {
        EditorOutcome::Render(view) => *view,
        EditorOutcome::Saved { .. } => panic!("expected the form to be rendered"),
    }
}

fn with(mut pairs: Vec<(String, String)>, extra: &[(&str, &str)]) -> FormFields {
    for (k, v) in extra {
        pairs.retain(|(key, _)| key != k);
        pairs.push((k.to_string(), v.to_string()));
    }
    FormFields::new(pairs)
}

#[test]
fn test_create_saves_everything_in_one_go() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");

    let fields = FormFields::new(valid_recipe_form("Coconut Rice"));
    let outcome =
        editor::process_submission(&mut conn, alice.id.unwrap(), None, &fields).unwrap();

    let EditorOutcome::Saved { recipe_id, redirect } = outcome else {
        panic!("expected a save");
    };
    assert_eq!(redirect, "/");

    let recipe = Recipe::find_by_id(&conn, recipe_id).unwrap().unwrap();
    assert_eq!(recipe.recipe_name, "Coconut Rice");
    assert_eq!(recipe.difficulty, 3);
    assert_eq!(recipe.instructions, "Rinse the rice\nSimmer for 12 minutes");

    let ingredients = RecipeIngredient::find_by_recipe(&conn, recipe_id).unwrap();
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0].amount, 150);
    assert_eq!(ingredients[0].units, Unit::Grams);

    let cuisine = Tag::find_by_recipe(&conn, TagKind::Cuisine, recipe_id).unwrap();
    assert_eq!(cuisine.len(), 1);
    assert_eq!(cuisine[0].name, "Thai");
}

#[test]
fn test_blank_ingredients_write_nothing() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");

    let fields = with(
        valid_recipe_form("Empty Pantry"),
        &[("ingredient_name_0", "   ")],
    );
    let view = render(
        editor::process_submission(&mut conn, alice.id.unwrap(), None, &fields).unwrap(),
    );

    assert_eq!(view.phase, FormPhase::ValidationFailed);
    assert_eq!(view.errors.ingredient_error.as_deref(), Some(INGREDIENT_REQUIRED));
    assert!(view.errors.instruction_error.is_none());
    assert_eq!(count_rows(&conn, "recipes"), 0);
    assert_eq!(count_rows(&conn, "recipe_ingredients"), 0);
    assert_eq!(count_rows(&conn, "cuisine_tags"), 0);
}

#[test]
fn test_all_error_channels_reported_together() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");

    let fields = FormFields::from_pairs(&[
        ("recipe_name", ""),
        ("difficulty", "9"),
        ("description", "Nothing yet"),
    ]);
    let view = render(
        editor::process_submission(&mut conn, alice.id.unwrap(), None, &fields).unwrap(),
    );

    assert!(view.errors.fields.contains_key("recipe_name"));
    assert!(view.errors.fields.contains_key("difficulty"));
    assert_eq!(view.errors.ingredient_error.as_deref(), Some(INGREDIENT_REQUIRED));
    assert_eq!(view.errors.instruction_error.as_deref(), Some(INSTRUCTION_REQUIRED));
    // One placeholder row per list
    assert_eq!(view.rows.ingredients.len(), 1);
    assert_eq!(view.rows.instructions, vec![String::new()]);
}

#[test]
fn test_row_actions_keep_form_unsaved() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");
    let author_id = alice.id.unwrap();

    let added = with(valid_recipe_form("Stew"), &[("add_ingredient", "")]);
    let view = render(editor::process_submission(&mut conn, author_id, None, &added).unwrap());
    assert_eq!(view.phase, FormPhase::DirtyUnsaved);
    assert_eq!(view.rows.ingredients.len(), 2);
    assert_eq!(view.rows.ingredients[0].name, "Rice");

    // Deleting the only instruction-free row leaves a placeholder
    let deleted = with(
        valid_recipe_form("Stew"),
        &[("delete_cuisine_tag_0", ""), (editor::PHASE_FIELD, "dirty_unsaved")],
    );
    let view = render(editor::process_submission(&mut conn, author_id, None, &deleted).unwrap());
    assert_eq!(view.rows.cuisine_tags, vec![String::new()]);
    assert_eq!(view.phase, FormPhase::DirtyUnsaved);

    // Out of range deletes change nothing
    let out_of_range = with(valid_recipe_form("Stew"), &[("delete_instruction_7", "")]);
    let view =
        render(editor::process_submission(&mut conn, author_id, None, &out_of_range).unwrap());
    assert_eq!(view.rows.instructions.len(), 2);

    assert_eq!(count_rows(&conn, "recipes"), 0);
}

#[test]
fn test_edit_replaces_ingredients_and_tags() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");
    let recipe_id = create_recipe(&conn, &alice, "Bread");
    let recipe = Recipe::find_by_id(&conn, recipe_id).unwrap().unwrap();

    let initial = editor::initial_edit_view(&conn, &recipe).unwrap();
    assert_eq!(initial.phase, FormPhase::Initial);
    assert_eq!(initial.rows.ingredients[0].name, "Flour");
    assert_eq!(initial.rows.instructions, vec!["Chop", "Cook"]);

    let fields = FormFields::from_pairs(&[
        ("recipe_name", "Better Bread"),
        ("difficulty", "4"),
        ("description", "Crusty"),
        ("ingredient_id_0", "1"),
        ("ingredient_name_0", "Rye flour"),
        ("ingredient_amount_0", "-3"),
        ("ingredient_units_0", "cups"),
        ("ingredient_name_1", "Water"),
        ("ingredient_amount_1", "300"),
        ("ingredient_units_1", "ml"),
        ("instruction_step_0", "Knead"),
        ("dietary_tag_0", "Vegan"),
        ("dietary_tag_1", "vegan"),
    ]);
    let outcome =
        editor::process_submission(&mut conn, alice.id.unwrap(), Some(&recipe), &fields).unwrap();
    let EditorOutcome::Saved { redirect, .. } = outcome else {
        panic!("expected a save");
    };
    assert_eq!(redirect, format!("/recipes/{}/", recipe_id));

    let ingredients = RecipeIngredient::find_by_recipe(&conn, recipe_id).unwrap();
    let names: Vec<&str> = ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Rye flour", "Water"]);
    // Non-positive amount falls back to 1, unknown unit to grams
    assert_eq!(ingredients[0].amount, 1);
    assert_eq!(ingredients[0].units, Unit::Grams);
    assert_eq!(ingredients[1].units, Unit::Millilitres);

    let updated = Recipe::find_by_id(&conn, recipe_id).unwrap().unwrap();
    assert_eq!(updated.recipe_name, "Better Bread");
    assert_eq!(updated.instructions, "Knead");
    assert_eq!(updated.publication_date, recipe.publication_date);
}

#[test]
fn test_non_author_cannot_edit_or_delete() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");
    let mallory = create_user(&conn, "mallory");
    let recipe_id = create_recipe(&conn, &alice, "Bread");
    let recipe = Recipe::find_by_id(&conn, recipe_id).unwrap().unwrap();

    let fields = FormFields::new(valid_recipe_form("Stolen Bread"));
    let err = editor::process_submission(&mut conn, mallory.id.unwrap(), Some(&recipe), &fields)
        .unwrap_err();
    assert!(matches!(err, potluck::Error::Forbidden(_)));

    let err = editor::delete_recipe(&conn, mallory.id.unwrap(), recipe_id).unwrap_err();
    assert!(matches!(err, potluck::Error::Forbidden(_)));

    let unchanged = Recipe::find_by_id(&conn, recipe_id).unwrap().unwrap();
    assert_eq!(unchanged, recipe);

    editor::delete_recipe(&conn, alice.id.unwrap(), recipe_id).unwrap();
    assert!(Recipe::find_by_id(&conn, recipe_id).unwrap().is_none());
}

#[test]
fn test_padded_fields_validate_as_stored() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");

    let long_name = "n".repeat(250);
    let padded_name = format!("    {}    ", long_name);
    let fields = with(
        valid_recipe_form("unused"),
        &[
            ("recipe_name", padded_name.as_str()),
            ("description", "  Weeknight dinner \n"),
        ],
    );
    let outcome =
        editor::process_submission(&mut conn, alice.id.unwrap(), None, &fields).unwrap();
    let EditorOutcome::Saved { recipe_id, .. } = outcome else {
        panic!("expected a save");
    };

    let recipe = Recipe::find_by_id(&conn, recipe_id).unwrap().unwrap();
    assert_eq!(recipe.recipe_name, long_name);
    assert_eq!(recipe.description, "Weeknight dinner");
}
