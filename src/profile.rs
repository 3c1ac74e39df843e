// src/profile.rs

//! Profile pages and account registration

use crate::db::models::{Favourite, Follow, Recipe, User};
use crate::error::{Error, Result};
use crate::forms::{FieldDef, FieldErrors, FormFields, sign_up_form, validate_form};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

pub const OWN_PROFILE_TEMPLATE: &str = "profile_page.html";
pub const OTHER_PROFILE_TEMPLATE: &str = "other_user_profile.html";
pub const SIGN_UP_TEMPLATE: &str = "sign_up.html";

/// Tab selected when none is requested
pub const DEFAULT_TAB: &str = "account";

/// Public face of a user in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Option<i64>,
    pub username: String,
    pub full_name: String,
    pub gravatar: String,
    pub mini_gravatar: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name(),
            gravatar: user.gravatar(120),
            mini_gravatar: user.mini_gravatar(),
        }
    }
}

/// A recipe in a profile listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecipe {
    pub recipe: Recipe,
    pub is_favourite: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub template: &'static str,
    pub profile_user: UserSummary,
    pub is_own_profile: bool,
    /// Own profile only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_tab: Option<String>,
    /// Other profiles only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
    pub recipes_with_fav: Vec<ProfileRecipe>,
    /// Own profile only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favourites: Option<Vec<Recipe>>,
    pub followers_count: i64,
    pub following_count: i64,
    pub recipes_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favourites_count: Option<i64>,
}

fn summaries(users: &[User]) -> Vec<UserSummary> {
    users.iter().map(UserSummary::from).collect()
}

fn flag_favourites(recipes: Vec<Recipe>, favourite_ids: &HashSet<i64>) -> Vec<ProfileRecipe> {
    recipes
        .into_iter()
        .map(|recipe| {
            let is_favourite = recipe.id.is_some_and(|id| favourite_ids.contains(&id));
            ProfileRecipe {
                recipe,
                is_favourite,
            }
        })
        .collect()
}

fn user_id(user: &User) -> Result<i64> {
    user.id
        .ok_or_else(|| Error::NotFoundError(format!("User {} has not been saved", user.username)))
}

/// The viewer's own profile, with `tab` defaulting to `account`
pub fn own_profile(conn: &Connection, viewer: &User, tab: Option<&str>) -> Result<ProfileView> {
    let id = user_id(viewer)?;
    let favourite_ids = Favourite::recipe_ids_for_user(conn, id)?;
    let recipes = Recipe::find_by_author(conn, id)?;
    let tab = tab.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TAB);

    Ok(ProfileView {
        template: OWN_PROFILE_TEMPLATE,
        profile_user: UserSummary::from(viewer),
        is_own_profile: true,
        selected_tab: Some(tab.to_string()),
        is_following: None,
        followers: summaries(&Follow::followers(conn, id)?),
        following: summaries(&Follow::following(conn, id)?),
        recipes_count: recipes.len(),
        recipes_with_fav: flag_favourites(recipes, &favourite_ids),
        favourites: Some(Favourite::recipes_for_user(conn, id)?),
        followers_count: Follow::followers_count(conn, id)?,
        following_count: Follow::following_count(conn, id)?,
        favourites_count: Some(Favourite::count_for_user(conn, id)?),
    })
}

/// Another user's public profile as seen by `viewer`
pub fn other_profile(conn: &Connection, viewer: &User, profile_id: i64) -> Result<ProfileView> {
    let viewer_id = user_id(viewer)?;
    let profile_user = User::find_by_id(conn, profile_id)?
        .ok_or_else(|| Error::NotFoundError(format!("User {} not found", profile_id)))?;

    let favourite_ids = Favourite::recipe_ids_for_user(conn, viewer_id)?;
    let recipes = Recipe::find_by_author(conn, profile_id)?;

    Ok(ProfileView {
        template: OTHER_PROFILE_TEMPLATE,
        profile_user: UserSummary::from(&profile_user),
        is_own_profile: false,
        selected_tab: None,
        is_following: Some(Follow::is_following(conn, viewer_id, profile_id)?),
        followers: summaries(&Follow::followers(conn, profile_id)?),
        following: summaries(&Follow::following(conn, profile_id)?),
        recipes_count: recipes.len(),
        recipes_with_fav: flag_favourites(recipes, &favourite_ids),
        favourites: None,
        followers_count: Follow::followers_count(conn, profile_id)?,
        following_count: Follow::following_count(conn, profile_id)?,
        favourites_count: None,
    })
}

/// The sign-up form, empty or with the rejected submission
#[derive(Debug, Clone, Serialize)]
pub struct SignUpView {
    pub template: &'static str,
    pub form: Vec<FieldDef>,
    pub values: BTreeMap<String, String>,
    pub errors: FieldErrors,
}

pub fn sign_up_view() -> SignUpView {
    SignUpView {
        template: SIGN_UP_TEMPLATE,
        form: sign_up_form(),
        values: BTreeMap::new(),
        errors: FieldErrors::new(),
    }
}

#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    Registered(User),
    Invalid(Box<SignUpView>),
}

/// Register a new account from a sign-up submission
///
/// A taken username or email becomes an error on that field.
pub fn register(conn: &Connection, fields: &FormFields) -> Result<SignUpOutcome> {
    let form = sign_up_form();
    let values: BTreeMap<String, String> = form
        .iter()
        .map(|def| (def.name.to_string(), fields.value(def.name).trim().to_string()))
        .collect();
    let mut errors = validate_form(&form, fields);

    let username = &values["username"];
    let email = &values["email"];
    if !errors.contains_key("username") && User::find_by_username(conn, username)?.is_some() {
        errors.insert(
            "username".to_string(),
            vec!["User with this Username already exists.".to_string()],
        );
    }
    if !errors.contains_key("email") && User::find_by_email(conn, email)?.is_some() {
        errors.insert(
            "email".to_string(),
            vec!["User with this Email already exists.".to_string()],
        );
    }

    if errors.is_empty() {
        let mut user = User::new(
            username.clone(),
            values["first_name"].clone(),
            values["last_name"].clone(),
            email.clone(),
        );
        match user.insert(conn) {
            Ok(id) => {
                info!("Registered user {} ({})", user.username, id);
                return Ok(SignUpOutcome::Registered(user));
            }
            Err(Error::AlreadyExists(msg)) => {
                errors.insert("username".to_string(), vec![format!("Already exists: {}", msg)]);
            }
            Err(e) => return Err(e),
        }
    }

    warn!("Sign-up rejected for {:?}: {} field(s) invalid", username, errors.len());
    Ok(SignUpOutcome::Invalid(Box::new(SignUpView {
        template: SIGN_UP_TEMPLATE,
        form,
        values,
        errors,
    })))
}
