// src/social.rs

//! Following users and favouriting recipes on behalf of a viewer

use crate::db::models::{Favourite, Follow, Recipe, User};
use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::info;

/// What a follow/unfollow or favourite/unfavourite request changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialOutcome {
    /// The relationship was created or removed
    Changed,
    /// It was already in the requested state
    Unchanged,
    /// The viewer targeted themself
    SelfTarget,
}

impl SocialOutcome {
    fn from_changed(changed: bool) -> Self {
        if changed {
            SocialOutcome::Changed
        } else {
            SocialOutcome::Unchanged
        }
    }
}

fn target_user(conn: &Connection, user_id: i64) -> Result<User> {
    User::find_by_id(conn, user_id)?
        .ok_or_else(|| Error::NotFoundError(format!("User {} not found", user_id)))
}

fn target_recipe(conn: &Connection, recipe_id: i64) -> Result<Recipe> {
    Recipe::find_by_id(conn, recipe_id)?
        .ok_or_else(|| Error::NotFoundError(format!("Recipe {} not found", recipe_id)))
}

pub fn follow_user(conn: &Connection, viewer_id: i64, target_id: i64) -> Result<SocialOutcome> {
    let target = target_user(conn, target_id)?;
    if viewer_id == target_id {
        info!("User {} tried to follow themself", viewer_id);
        return Ok(SocialOutcome::SelfTarget);
    }

    let outcome = SocialOutcome::from_changed(Follow::follow(conn, viewer_id, target_id)?);
    match outcome {
        SocialOutcome::Changed => info!("User {} is now following {}", viewer_id, target.username),
        _ => info!("User {} already follows {}", viewer_id, target.username),
    }
    Ok(outcome)
}

pub fn unfollow_user(conn: &Connection, viewer_id: i64, target_id: i64) -> Result<SocialOutcome> {
    let target = target_user(conn, target_id)?;
    if viewer_id == target_id {
        info!("User {} tried to unfollow themself", viewer_id);
        return Ok(SocialOutcome::SelfTarget);
    }

    let outcome = SocialOutcome::from_changed(Follow::unfollow(conn, viewer_id, target_id)?);
    match outcome {
        SocialOutcome::Changed => info!("User {} unfollowed {}", viewer_id, target.username),
        _ => info!("User {} was not following {}", viewer_id, target.username),
    }
    Ok(outcome)
}

pub fn favourite_recipe(conn: &Connection, viewer_id: i64, recipe_id: i64) -> Result<SocialOutcome> {
    let recipe = target_recipe(conn, recipe_id)?;
    let outcome = SocialOutcome::from_changed(Favourite::add(conn, viewer_id, recipe_id)?);
    match outcome {
        SocialOutcome::Changed => {
            info!("User {} added {} to favourites", viewer_id, recipe.recipe_name)
        }
        _ => info!("User {} already favourited {}", viewer_id, recipe.recipe_name),
    }
    Ok(outcome)
}

pub fn unfavourite_recipe(
    conn: &Connection,
    viewer_id: i64,
    recipe_id: i64,
) -> Result<SocialOutcome> {
    let recipe = target_recipe(conn, recipe_id)?;
    let outcome = SocialOutcome::from_changed(Favourite::remove(conn, viewer_id, recipe_id)?);
    match outcome {
        SocialOutcome::Changed => {
            info!("User {} removed {} from favourites", viewer_id, recipe.recipe_name)
        }
        _ => info!("{} is not in user {}'s favourites", recipe.recipe_name, viewer_id),
    }
    Ok(outcome)
}
