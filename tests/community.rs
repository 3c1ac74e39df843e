// tests/community.rs

//! Ratings, comments and favourites across modules.

mod common;

use common::{count_rows, create_recipe, create_user, fields, setup_test_db};
use potluck::browse::{self, BrowseQuery};
use potluck::db;
use potluck::db::models::{Comment, Favourite, Rating, Recipe, Tag, TagKind};
use potluck::detail::{self, DetailOutcome};
use potluck::profile;
use potluck::social::{self, SocialOutcome};

#[test]
fn test_author_delete_removes_recipe_content() {
    let (_dir, db_path) = setup_test_db();
    let conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");
    let bob = create_user(&conn, "bob");
    let recipe_id = create_recipe(&conn, &alice, "Pie");
    let bob_id = bob.id.unwrap();

    Rating::submit(&conn, bob_id, recipe_id, 4).unwrap();
    Comment::new(recipe_id, bob_id, "Lovely".to_string())
        .insert(&conn)
        .unwrap();
    Favourite::add(&conn, bob_id, recipe_id).unwrap();
    let thai = Tag::get_or_create(&conn, TagKind::Cuisine, "Thai").unwrap();
    Tag::set_for_recipe(&conn, TagKind::Cuisine, recipe_id, &[thai.id]).unwrap();

    assert_eq!(count_rows(&conn, "recipe_ingredients"), 1);
    assert_eq!(count_rows(&conn, "recipe_cuisine_tags"), 1);

    potluck::editor::delete_recipe(&conn, alice.id.unwrap(), recipe_id).unwrap();

    for table in [
        "recipe_ingredients",
        "ratings",
        "comments",
        "favourites",
        "recipe_cuisine_tags",
    ] {
        assert_eq!(count_rows(&conn, table), 0, "{} should be empty", table);
    }
    // Tags themselves survive
    assert_eq!(count_rows(&conn, "cuisine_tags"), 1);
}

#[test]
fn test_rating_replaces_previous_score() {
    let (_dir, db_path) = setup_test_db();
    let conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");
    let bob = create_user(&conn, "bob");
    let carol = create_user(&conn, "carol");
    let recipe_id = create_recipe(&conn, &alice, "Pie");

    Rating::submit(&conn, bob.id.unwrap(), recipe_id, 2).unwrap();
    let outcome = detail::submit_detail_form(
        &conn,
        recipe_id,
        bob.id.unwrap(),
        Some("3"),
        &fields(&[("rating", "4"), ("submit_rating", "")]),
    )
    .unwrap();
    let DetailOutcome::Redirect(url) = outcome else {
        panic!("expected a redirect");
    };
    assert_eq!(url, format!("/recipes/{}/?servings=3", recipe_id));

    Rating::submit(&conn, carol.id.unwrap(), recipe_id, 5).unwrap();
    assert_eq!(Rating::count_for_recipe(&conn, recipe_id).unwrap(), 2);

    let recipe = Recipe::find_by_id(&conn, recipe_id).unwrap().unwrap();
    assert_eq!(recipe.average_rating(&conn).unwrap(), Some(4.5));

    let view = detail::build_detail(&conn, recipe_id, bob.id.unwrap(), 2).unwrap();
    assert_eq!(view.user_rating, Some(4));
    assert_eq!(view.total_ratings, 2);
    assert_eq!(view.ingredients_list[0].amount, 400.0);
    assert_eq!(view.ingredients_list[0].base_amount, 200);
}

#[test]
fn test_favourites_show_everywhere() {
    let (_dir, db_path) = setup_test_db();
    let conn = db::open(&db_path).unwrap();
    let alice = create_user(&conn, "alice");
    let bob = create_user(&conn, "bob");
    let pie = create_recipe(&conn, &alice, "Pie");
    create_recipe(&conn, &alice, "Tart");
    let bob_id = bob.id.unwrap();

    assert_eq!(
        social::favourite_recipe(&conn, bob_id, pie).unwrap(),
        SocialOutcome::Changed
    );

    let own = profile::own_profile(&conn, &bob, Some("favourites")).unwrap();
    assert_eq!(own.selected_tab.as_deref(), Some("favourites"));
    assert_eq!(own.favourites_count, Some(1));

    let listing = browse::build_welcome(&conn, Some(&bob), &BrowseQuery::default()).unwrap();
    let flagged: Vec<&str> = listing
        .recipe_data
        .iter()
        .filter(|card| card.is_favourite)
        .map(|card| card.recipe.recipe_name.as_str())
        .collect();
    assert_eq!(flagged, vec!["Pie"]);

    let detail_view = detail::build_detail(&conn, pie, bob_id, 1).unwrap();
    assert!(detail_view.has_favourited);

    social::unfavourite_recipe(&conn, bob_id, pie).unwrap();
    assert_eq!(Favourite::count_for_user(&conn, bob_id).unwrap(), 0);
}
