// src/detail.rs

//! Recipe detail page: scaled ingredients, ratings, comments
//!
//! The page is also the target of comment and rating submissions. A valid
//! submission redirects back to the page, keeping the `servings` parameter.

use crate::db::models::{
    Comment, Favourite, Rating, RatingOutcome, Recipe, RecipeIngredient, Tag, TagKind, Unit, User,
    round_to,
};
use crate::error::{Error, Result};
use crate::forms::{FieldDef, FieldErrors, FormFields, comment_form, rating_form, validate_form};
use crate::profile::UserSummary;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

pub const DETAIL_TEMPLATE: &str = "recipe.html";

/// Submission key that marks the rating form
pub const RATING_SUBMIT_KEY: &str = "submit_rating";

/// Servings multiplier from the query string; anything unusable is 1
pub fn parse_servings(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.max(1))
        .unwrap_or(1)
}

/// An ingredient scaled for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledIngredient {
    pub name: String,
    /// Rounded to one decimal place
    pub amount: f64,
    pub units: Unit,
    /// The stored, unscaled amount
    pub base_amount: i64,
}

pub fn scale_ingredient(ingredient: &RecipeIngredient, servings: i64) -> ScaledIngredient {
    ScaledIngredient {
        name: ingredient.name.clone(),
        amount: round_to(ingredient.amount as f64 * servings as f64, 1),
        units: ingredient.units,
        base_amount: ingredient.amount,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Option<i64>,
    pub text: String,
    pub created_at: Option<String>,
    pub author: Option<UserSummary>,
}

/// Everything the detail template needs
///
/// `recipe` is `None` when the requested recipe does not exist.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetailView {
    pub template: &'static str,
    pub recipe: Option<Recipe>,
    pub author: Option<UserSummary>,
    pub cuisine_tags: Vec<String>,
    pub dietary_tags: Vec<String>,
    pub ingredients_list: Vec<ScaledIngredient>,
    pub instructions_list: Vec<String>,
    pub comments: Vec<CommentView>,
    /// Mean rating to one decimal place
    pub avg_rating: Option<f64>,
    pub total_ratings: i64,
    pub user_rating: Option<i64>,
    pub has_favourited: bool,
    pub is_author: bool,
    pub servings: i64,
    pub comment_form: Vec<FieldDef>,
    pub rating_form: Vec<FieldDef>,
    pub comment_errors: FieldErrors,
    pub rating_errors: FieldErrors,
}

impl RecipeDetailView {
    /// The page for a recipe that does not exist
    pub fn not_found() -> Self {
        Self {
            template: DETAIL_TEMPLATE,
            recipe: None,
            author: None,
            cuisine_tags: Vec::new(),
            dietary_tags: Vec::new(),
            ingredients_list: Vec::new(),
            instructions_list: Vec::new(),
            comments: Vec::new(),
            avg_rating: None,
            total_ratings: 0,
            user_rating: None,
            has_favourited: false,
            is_author: false,
            servings: 1,
            comment_form: Vec::new(),
            rating_form: Vec::new(),
            comment_errors: FieldErrors::new(),
            rating_errors: FieldErrors::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.recipe.is_some()
    }
}

/// Build the detail page of `recipe_id` for `viewer_id`
pub fn build_detail(
    conn: &Connection,
    recipe_id: i64,
    viewer_id: i64,
    servings: i64,
) -> Result<RecipeDetailView> {
    let Some(recipe) = Recipe::find_by_id(conn, recipe_id)? else {
        return Ok(RecipeDetailView::not_found());
    };

    let servings = servings.max(1);
    let ingredients_list = RecipeIngredient::find_by_recipe(conn, recipe_id)?
        .iter()
        .map(|ing| scale_ingredient(ing, servings))
        .collect();

    let mut comments = Vec::new();
    for comment in Comment::find_by_recipe(conn, recipe_id)? {
        let author = User::find_by_id(conn, comment.author_id)?;
        comments.push(CommentView {
            id: comment.id,
            text: comment.text,
            created_at: comment.created_at,
            author: author.as_ref().map(UserSummary::from),
        });
    }

    let tag_names = |kind| -> Result<Vec<String>> {
        Ok(Tag::find_by_recipe(conn, kind, recipe_id)?
            .into_iter()
            .map(|t| t.name)
            .collect())
    };

    Ok(RecipeDetailView {
        template: DETAIL_TEMPLATE,
        author: User::find_by_id(conn, recipe.author_id)?
            .as_ref()
            .map(UserSummary::from),
        cuisine_tags: tag_names(TagKind::Cuisine)?,
        dietary_tags: tag_names(TagKind::Dietary)?,
        ingredients_list,
        instructions_list: recipe.instruction_lines(),
        comments,
        avg_rating: Rating::average_for_recipe(conn, recipe_id)?.map(|avg| round_to(avg, 1)),
        total_ratings: Rating::count_for_recipe(conn, recipe_id)?,
        user_rating: Rating::find_for_user(conn, viewer_id, recipe_id)?.map(|r| r.rating),
        has_favourited: Favourite::exists(conn, viewer_id, recipe_id)?,
        is_author: recipe.author_id == viewer_id,
        servings,
        comment_form: comment_form(),
        rating_form: rating_form(),
        comment_errors: FieldErrors::new(),
        rating_errors: FieldErrors::new(),
        recipe: Some(recipe),
    })
}

/// Detail page URL, keeping a non-empty raw `servings` value
pub fn detail_redirect(recipe_id: i64, servings: Option<&str>) -> String {
    let url = format!("/recipes/{}/", recipe_id);
    match servings.filter(|s| !s.is_empty()) {
        Some(servings) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("servings", servings)
                .finish();
            format!("{}?{}", url, query)
        }
        None => url,
    }
}

/// Result of a POST to the detail page
#[derive(Debug, Clone)]
pub enum DetailOutcome {
    Redirect(String),
    Render(Box<RecipeDetailView>),
}

/// Handle a comment or rating posted to the detail page
///
/// `servings` is the raw query value.
pub fn submit_detail_form(
    conn: &Connection,
    recipe_id: i64,
    viewer_id: i64,
    servings: Option<&str>,
    fields: &FormFields,
) -> Result<DetailOutcome> {
    if Recipe::find_by_id(conn, recipe_id)?.is_none() {
        return Ok(DetailOutcome::Render(Box::new(RecipeDetailView::not_found())));
    }

    let (comment_errors, rating_errors) = if fields.contains(RATING_SUBMIT_KEY) {
        match store_rating(conn, recipe_id, viewer_id, fields)? {
            Ok(_) => return Ok(DetailOutcome::Redirect(detail_redirect(recipe_id, servings))),
            Err(errors) => (FieldErrors::new(), errors),
        }
    } else {
        let errors = validate_form(&comment_form(), fields);
        if errors.is_empty() {
            let mut comment =
                Comment::new(recipe_id, viewer_id, fields.value("text").trim().to_string());
            comment.insert(conn)?;
            info!("User {} commented on recipe {}", viewer_id, recipe_id);
            return Ok(DetailOutcome::Redirect(detail_redirect(recipe_id, servings)));
        }
        (errors, FieldErrors::new())
    };

    warn!("Rejected detail-page submission for recipe {}", recipe_id);
    let mut view = build_detail(conn, recipe_id, viewer_id, parse_servings(servings))?;
    view.comment_errors = comment_errors;
    view.rating_errors = rating_errors;
    Ok(DetailOutcome::Render(Box::new(view)))
}

/// Validate and store a rating; the inner `Err` carries form errors
fn store_rating(
    conn: &Connection,
    recipe_id: i64,
    viewer_id: i64,
    fields: &FormFields,
) -> Result<std::result::Result<RatingOutcome, FieldErrors>> {
    let errors = validate_form(&rating_form(), fields);
    if !errors.is_empty() {
        return Ok(Err(errors));
    }

    let value: i64 = fields
        .value("rating")
        .trim()
        .parse()
        .map_err(|_| Error::ParseError("rating is not a number".to_string()))?;
    let outcome = Rating::submit(conn, viewer_id, recipe_id, value)?;
    info!(
        "User {} rating of recipe {} {}",
        viewer_id,
        recipe_id,
        outcome.as_str()
    );
    Ok(Ok(outcome))
}

/// Standalone rating endpoint; invalid values change nothing
///
/// Returns `None` when the submission was rejected.
pub fn rate_recipe(
    conn: &Connection,
    recipe_id: i64,
    viewer_id: i64,
    fields: &FormFields,
) -> Result<Option<RatingOutcome>> {
    if Recipe::find_by_id(conn, recipe_id)?.is_none() {
        return Err(Error::NotFoundError(format!("Recipe {} not found", recipe_id)));
    }

    match store_rating(conn, recipe_id, viewer_id, fields)? {
        Ok(outcome) => Ok(Some(outcome)),
        Err(_) => {
            warn!("Invalid rating submission for recipe {}", recipe_id);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;
    use tempfile::NamedTempFile;

    struct Fixture {
        _temp: NamedTempFile,
        conn: Connection,
        author: i64,
        reader: i64,
        recipe: i64,
    }

    fn setup() -> Fixture {
        let temp = NamedTempFile::new().unwrap();
        let conn = Connection::open(temp.path()).unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        schema::migrate(&conn).unwrap();

        let author = User::new(
            "@johndoe".to_string(),
            "John".to_string(),
            "Doe".to_string(),
            "john@example.org".to_string(),
        )
        .insert(&conn)
        .unwrap();
        let reader = User::new(
            "@janedoe".to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
            "jane@example.org".to_string(),
        )
        .insert(&conn)
        .unwrap();

        let mut recipe = Recipe::new(author, "Bread".to_string(), "Crusty".to_string());
        recipe.instructions = "Knead\nBake".to_string();
        let recipe_id = recipe.insert(&conn).unwrap();
        let mut ingredients = vec![
            RecipeIngredient::new(recipe_id, "flour".to_string(), 500, Unit::Grams),
            RecipeIngredient::new(recipe_id, "water".to_string(), 3, Unit::Litres),
        ];
        RecipeIngredient::replace_for_recipe(&conn, recipe_id, &mut ingredients).unwrap();

        Fixture {
            _temp: temp,
            conn,
            author,
            reader,
            recipe: recipe_id,
        }
    }

    #[test]
    fn test_parse_servings() {
        assert_eq!(parse_servings(None), 1);
        assert_eq!(parse_servings(Some("3")), 3);
        assert_eq!(parse_servings(Some("0")), 1);
        assert_eq!(parse_servings(Some("-2")), 1);
        assert_eq!(parse_servings(Some("two")), 1);
        assert_eq!(parse_servings(Some("")), 1);
    }

    #[test]
    fn test_scale_ingredient() {
        let ing = RecipeIngredient::new(1, "salt".to_string(), 7, Unit::Grams);
        let scaled = scale_ingredient(&ing, 2);
        assert_eq!(scaled.amount, 14.0);
        assert_eq!(scaled.base_amount, 7);
    }

    #[test]
    fn test_detail_doubles_for_two_servings() {
        let f = setup();
        let view = build_detail(&f.conn, f.recipe, f.reader, 2).unwrap();
        let amounts: Vec<f64> = view.ingredients_list.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![1000.0, 6.0]);
        assert_eq!(view.servings, 2);
        assert_eq!(view.instructions_list, vec!["Knead", "Bake"]);
        assert!(!view.is_author);
        assert!(view.avg_rating.is_none());
    }

    #[test]
    fn test_detail_rating_summary() {
        let f = setup();
        Rating::submit(&f.conn, f.author, f.recipe, 5).unwrap();
        Rating::submit(&f.conn, f.reader, f.recipe, 4).unwrap();
        let third = User::new(
            "@charlie".to_string(),
            "Charlie".to_string(),
            "Brown".to_string(),
            "charlie@example.org".to_string(),
        )
        .insert(&f.conn)
        .unwrap();
        Rating::submit(&f.conn, third, f.recipe, 5).unwrap();

        let view = build_detail(&f.conn, f.recipe, f.reader, 1).unwrap();
        assert_eq!(view.avg_rating, Some(4.7));
        assert_eq!(view.total_ratings, 3);
        assert_eq!(view.user_rating, Some(4));

        let recipe = view.recipe.unwrap();
        assert_eq!(recipe.average_rating(&f.conn).unwrap(), Some(4.67));
    }

    #[test]
    fn test_missing_recipe() {
        let f = setup();
        let view = build_detail(&f.conn, 999, f.reader, 1).unwrap();
        assert!(!view.is_found());
        assert!(view.comments.is_empty());
    }

    #[test]
    fn test_comment_redirect_keeps_servings() {
        let f = setup();
        let fields = FormFields::from_pairs(&[("text", "Lovely")]);
        let outcome = submit_detail_form(&f.conn, f.recipe, f.reader, Some("4"), &fields).unwrap();
        let DetailOutcome::Redirect(url) = outcome else {
            panic!("expected redirect");
        };
        assert_eq!(url, format!("/recipes/{}/?servings=4", f.recipe));

        let view = build_detail(&f.conn, f.recipe, f.reader, 1).unwrap();
        assert_eq!(view.comments.len(), 1);
        assert_eq!(
            view.comments[0].author.as_ref().map(|a| a.username.as_str()),
            Some("@janedoe")
        );
    }

    #[test]
    fn test_blank_comment_rerenders() {
        let f = setup();
        let fields = FormFields::from_pairs(&[("text", "   ")]);
        let outcome = submit_detail_form(&f.conn, f.recipe, f.reader, None, &fields).unwrap();
        let DetailOutcome::Render(view) = outcome else {
            panic!("expected the page again");
        };
        assert!(view.comment_errors.contains_key("text"));
        assert!(view.comments.is_empty());
    }

    #[test]
    fn test_rating_via_detail_form() {
        let f = setup();
        let fields = FormFields::from_pairs(&[("rating", "3"), (RATING_SUBMIT_KEY, "")]);
        let outcome = submit_detail_form(&f.conn, f.recipe, f.reader, Some(""), &fields).unwrap();
        let DetailOutcome::Redirect(url) = outcome else {
            panic!("expected redirect");
        };
        assert_eq!(url, format!("/recipes/{}/", f.recipe));

        let bad = FormFields::from_pairs(&[("rating", "9"), (RATING_SUBMIT_KEY, "")]);
        let DetailOutcome::Render(view) =
            submit_detail_form(&f.conn, f.recipe, f.reader, None, &bad).unwrap()
        else {
            panic!("expected the page again");
        };
        assert!(view.rating_errors.contains_key("rating"));
        assert_eq!(view.user_rating, Some(3));
    }

    #[test]
    fn test_rate_recipe() {
        let f = setup();
        let first = FormFields::from_pairs(&[("rating", "2")]);
        assert_eq!(
            rate_recipe(&f.conn, f.recipe, f.reader, &first).unwrap(),
            Some(RatingOutcome::Created)
        );
        let second = FormFields::from_pairs(&[("rating", "5")]);
        assert_eq!(
            rate_recipe(&f.conn, f.recipe, f.reader, &second).unwrap(),
            Some(RatingOutcome::Updated)
        );
        let invalid = FormFields::from_pairs(&[("rating", "zero")]);
        assert_eq!(rate_recipe(&f.conn, f.recipe, f.reader, &invalid).unwrap(), None);
        assert_eq!(Rating::count_for_recipe(&f.conn, f.recipe).unwrap(), 1);

        assert!(matches!(
            rate_recipe(&f.conn, 999, f.reader, &first),
            Err(Error::NotFoundError(_))
        ));
    }

    #[test]
    fn test_detail_redirect_encodes() {
        assert_eq!(detail_redirect(3, None), "/recipes/3/");
        assert_eq!(detail_redirect(3, Some("a b")), "/recipes/3/?servings=a+b");
    }
}
