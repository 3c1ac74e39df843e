// src/server/handlers/users.rs
//! Profile and sign-up handlers

use super::{ApiError, render, with_db};
use crate::forms::FormFields;
use crate::profile::{self, SignUpOutcome};
use crate::server::{ServerState, Viewer};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub tab: Option<String>,
}

/// GET /profile/
pub async fn own_profile(
    State(state): State<Arc<ServerState>>,
    Viewer(user): Viewer,
    Query(query): Query<ProfileQuery>,
) -> Result<Response, ApiError> {
    let view = with_db(&state, move |conn| {
        profile::own_profile(conn, &user, query.tab.as_deref())
    })
    .await?;
    Ok(render(StatusCode::OK, &view))
}

/// GET /users/:id/
pub async fn other_profile(
    State(state): State<Arc<ServerState>>,
    Viewer(user): Viewer,
    Path(user_id): Path<i64>,
) -> Result<Response, ApiError> {
    let view = with_db(&state, move |conn| {
        profile::other_profile(conn, &user, user_id)
    })
    .await?;
    Ok(render(StatusCode::OK, &view))
}

/// GET /sign_up/
pub async fn sign_up_form() -> Response {
    render(StatusCode::OK, &profile::sign_up_view())
}

/// POST /sign_up/
pub async fn sign_up_submit(
    State(state): State<Arc<ServerState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let fields = FormFields::new(pairs);
    let outcome = with_db(&state, move |conn| profile::register(conn, &fields)).await?;

    Ok(match outcome {
        SignUpOutcome::Registered(_) => Redirect::to("/").into_response(),
        SignUpOutcome::Invalid(view) => render(StatusCode::OK, &view),
    })
}
