// src/server/handlers/social.rs
//! Follow and favourite handlers

use super::{ApiError, referer, with_db};
use crate::server::{ServerState, Viewer};
use crate::social;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Redirect,
};
use std::sync::Arc;

/// POST /users/:id/follow/
pub async fn follow(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(user_id): Path<i64>,
) -> Result<Redirect, ApiError> {
    let viewer_id = viewer.id();
    with_db(&state, move |conn| social::follow_user(conn, viewer_id, user_id)).await?;
    Ok(Redirect::to(&format!("/users/{}/", user_id)))
}

/// POST /users/:id/unfollow/
pub async fn unfollow(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(user_id): Path<i64>,
) -> Result<Redirect, ApiError> {
    let viewer_id = viewer.id();
    with_db(&state, move |conn| social::unfollow_user(conn, viewer_id, user_id)).await?;
    Ok(Redirect::to(&format!("/users/{}/", user_id)))
}

/// POST /recipes/:id/favourite/
pub async fn favourite(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    let viewer_id = viewer.id();
    with_db(&state, move |conn| {
        social::favourite_recipe(conn, viewer_id, recipe_id)
    })
    .await?;
    Ok(Redirect::to(&referer(&headers).unwrap_or_else(|| "/".to_string())))
}

/// POST /recipes/:id/unfavourite/
pub async fn unfavourite(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    let viewer_id = viewer.id();
    with_db(&state, move |conn| {
        social::unfavourite_recipe(conn, viewer_id, recipe_id)
    })
    .await?;
    Ok(Redirect::to(&referer(&headers).unwrap_or_else(|| "/".to_string())))
}

/// GET /favourites/
pub async fn favourites(_viewer: Viewer) -> Redirect {
    Redirect::to("/profile/?tab=favourites")
}
