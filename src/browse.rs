// src/browse.rs

//! The welcome listing: search, tag filters, following filter, rating sort

use crate::db::models::{Favourite, Follow, Rating, Recipe, Tag, TagKind, User};
use crate::error::Result;
use crate::profile::UserSummary;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const WELCOME_TEMPLATE: &str = "welcome.html";

/// Query parameters of `GET /`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BrowseQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub cuisine_tags: Option<String>,
    pub dietary_tags: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Highest,
    Lowest,
}

impl SortOrder {
    /// `highest` or `lowest`; anything else keeps listing order
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            Some("highest") => Some(SortOrder::Highest),
            Some("lowest") => Some(SortOrder::Lowest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Five-slot star strip for an average rating; unrated recipes get none
pub fn build_stars(avg: Option<f64>) -> Vec<Star> {
    let Some(avg) = avg else {
        return Vec::new();
    };
    let full = (avg.floor().max(0.0) as usize).min(5);
    let half = usize::from(full < 5 && avg - full as f64 >= 0.5);
    let mut stars = vec![Star::Full; full];
    stars.extend(std::iter::repeat_n(Star::Half, half));
    stars.extend(std::iter::repeat_n(Star::Empty, 5 - full - half));
    stars
}

/// Comma-separated tag names, trimmed, blanks dropped
pub fn split_tag_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// One recipe on the welcome page
#[derive(Debug, Clone, Serialize)]
pub struct RecipeCard {
    pub recipe: Recipe,
    pub author: Option<UserSummary>,
    /// Mean rating to two decimal places
    pub avg: Option<f64>,
    pub stars: Vec<Star>,
    pub user_rating: Option<i64>,
    pub is_favourite: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WelcomeView {
    pub template: &'static str,
    pub query: BrowseQuery,
    pub recipe_data: Vec<RecipeCard>,
    pub count: usize,
}

/// Build the welcome listing for an optional viewer
pub fn build_welcome(
    conn: &Connection,
    viewer: Option<&User>,
    query: &BrowseQuery,
) -> Result<WelcomeView> {
    let viewer_id = viewer.and_then(|v| v.id);
    let mut recipes = Recipe::list_all(conn)?;

    if let Some(text) = query.q.as_deref().filter(|q| !q.is_empty()) {
        let matching = Recipe::search_ids(conn, text)?;
        recipes.retain(|r| r.id.is_some_and(|id| matching.contains(&id)));
    }

    for (kind, names) in [
        (TagKind::Cuisine, query.cuisine_tags.as_deref()),
        (TagKind::Dietary, query.dietary_tags.as_deref()),
    ] {
        let names = split_tag_names(names.unwrap_or(""));
        if names.is_empty() {
            continue;
        }
        let tag_ids: Vec<i64> = Tag::find_matching_names(conn, kind, &names)?
            .iter()
            .map(|t| t.id)
            .collect();
        // Unknown names match nothing rather than being ignored
        let tagged = Tag::recipe_ids_with_any(conn, kind, &tag_ids)?;
        recipes.retain(|r| r.id.is_some_and(|id| tagged.contains(&id)));
    }

    if query.filter.as_deref() == Some("following")
        && let Some(id) = viewer_id
    {
        let followed: HashSet<i64> = Follow::following(conn, id)?
            .iter()
            .filter_map(|u| u.id)
            .collect();
        recipes.retain(|r| followed.contains(&r.author_id));
    }

    let favourite_ids = match viewer_id {
        Some(id) => Favourite::recipe_ids_for_user(conn, id)?,
        None => HashSet::new(),
    };

    let mut authors: HashMap<i64, Option<UserSummary>> = HashMap::new();
    let mut cards = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let avg = recipe.average_rating(conn)?;
        let recipe_id = recipe.id.unwrap_or_default();
        let user_rating = match viewer_id {
            Some(id) => Rating::find_for_user(conn, id, recipe_id)?.map(|r| r.rating),
            None => None,
        };
        let author = match authors.get(&recipe.author_id) {
            Some(author) => author.clone(),
            None => {
                let author = User::find_by_id(conn, recipe.author_id)?
                    .as_ref()
                    .map(UserSummary::from);
                authors.insert(recipe.author_id, author.clone());
                author
            }
        };

        cards.push(RecipeCard {
            is_favourite: favourite_ids.contains(&recipe_id),
            recipe,
            author,
            avg,
            stars: build_stars(avg),
            user_rating,
        });
    }

    match SortOrder::parse(query.sort.as_deref()) {
        Some(SortOrder::Highest) => {
            cards.sort_by(|a, b| b.avg.unwrap_or(0.0).total_cmp(&a.avg.unwrap_or(0.0)))
        }
        Some(SortOrder::Lowest) => {
            cards.sort_by(|a, b| a.avg.unwrap_or(0.0).total_cmp(&b.avg.unwrap_or(0.0)))
        }
        None => {}
    }

    Ok(WelcomeView {
        template: WELCOME_TEMPLATE,
        query: query.clone(),
        count: cards.len(),
        recipe_data: cards,
    })
}
