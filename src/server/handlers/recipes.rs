// src/server/handlers/recipes.rs
//! Recipe form, detail page and rating handlers

use super::{ApiError, render, with_db};
use crate::db::models::Recipe;
use crate::detail::{self, DetailOutcome};
use crate::editor::{self, EditorOutcome};
use crate::forms::FormFields;
use crate::server::{ServerState, Viewer};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Query parameters of the detail page
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub servings: Option<String>,
}

fn editor_response(outcome: EditorOutcome) -> Response {
    match outcome {
        EditorOutcome::Render(view) => render(StatusCode::OK, &view),
        EditorOutcome::Saved { recipe_id, redirect } => {
            info!("Recipe {} saved, redirecting to {}", recipe_id, redirect);
            Redirect::to(&redirect).into_response()
        }
    }
}

fn find_recipe(conn: &rusqlite::Connection, recipe_id: i64) -> crate::Result<Recipe> {
    Recipe::find_by_id(conn, recipe_id)?
        .ok_or_else(|| crate::Error::NotFoundError(format!("Recipe {} not found", recipe_id)))
}

/// GET /create_recipe/
pub async fn create_form(_viewer: Viewer) -> Response {
    render(StatusCode::OK, &editor::initial_create_view())
}

/// POST /create_recipe/
pub async fn create_submit(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let fields = FormFields::new(pairs);
    let author_id = viewer.id();
    let outcome = with_db(&state, move |conn| {
        editor::process_submission(conn, author_id, None, &fields)
    })
    .await?;
    Ok(editor_response(outcome))
}

/// GET /recipe/:id/edit/
pub async fn edit_form(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
) -> Result<Response, ApiError> {
    let viewer_id = viewer.id();
    let view = with_db(&state, move |conn| {
        let recipe = find_recipe(conn, recipe_id)?;
        editor::ensure_author(&recipe, viewer_id)?;
        editor::initial_edit_view(conn, &recipe)
    })
    .await?;
    Ok(render(StatusCode::OK, &view))
}

/// POST /recipe/:id/edit/
pub async fn edit_submit(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let fields = FormFields::new(pairs);
    let viewer_id = viewer.id();
    let outcome = with_db(&state, move |conn| {
        let recipe = find_recipe(conn, recipe_id)?;
        editor::process_submission(conn, viewer_id, Some(&recipe), &fields)
    })
    .await?;
    Ok(editor_response(outcome))
}

/// GET /recipe/:id/delete/
///
/// Deletion needs a POST; a plain visit goes back to the recipe.
pub async fn delete_redirect(Path(recipe_id): Path<i64>) -> Redirect {
    Redirect::to(&format!("/recipes/{}/", recipe_id))
}

/// POST /recipe/:id/delete/
pub async fn delete_submit(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
) -> Result<Redirect, ApiError> {
    let viewer_id = viewer.id();
    with_db(&state, move |conn| {
        editor::delete_recipe(conn, viewer_id, recipe_id)
    })
    .await?;
    Ok(Redirect::to("/"))
}

/// GET /recipes/:id/
pub async fn detail_page(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
    Query(query): Query<DetailQuery>,
) -> Result<Response, ApiError> {
    let viewer_id = viewer.id();
    let servings = detail::parse_servings(query.servings.as_deref());
    let view = with_db(&state, move |conn| {
        detail::build_detail(conn, recipe_id, viewer_id, servings)
    })
    .await?;

    let status = if view.is_found() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok(render(status, &view))
}

/// POST /recipes/:id/
///
/// A comment, or a rating when `submit_rating` is present.
pub async fn detail_submit(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
    Query(query): Query<DetailQuery>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let fields = FormFields::new(pairs);
    let viewer_id = viewer.id();
    let outcome = with_db(&state, move |conn| {
        detail::submit_detail_form(conn, recipe_id, viewer_id, query.servings.as_deref(), &fields)
    })
    .await?;

    Ok(match outcome {
        DetailOutcome::Redirect(url) => Redirect::to(&url).into_response(),
        DetailOutcome::Render(view) if !view.is_found() => render(StatusCode::NOT_FOUND, &view),
        DetailOutcome::Render(view) => render(StatusCode::OK, &view),
    })
}

/// POST /recipes/:id/rate/
pub async fn rate(
    State(state): State<Arc<ServerState>>,
    viewer: Viewer,
    Path(recipe_id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, ApiError> {
    let fields = FormFields::new(pairs);
    let viewer_id = viewer.id();
    with_db(&state, move |conn| {
        detail::rate_recipe(conn, recipe_id, viewer_id, &fields)
    })
    .await?;
    Ok(Redirect::to(&detail::detail_redirect(recipe_id, None)))
}
