// src/server/auth.rs
//! Viewer identification
//!
//! An authenticating proxy in front of Potluck places the logged-in
//! username in a request header (see `[auth] user_header`). Handlers that
//! need a login take [`Viewer`]; pages open to everyone take
//! [`MaybeViewer`].

use crate::db::models::User;
use crate::server::ServerState;
use crate::server::handlers::{ApiError, with_db};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

/// The logged-in user of a login-required request
#[derive(Debug, Clone)]
pub struct Viewer(pub User);

impl Viewer {
    pub fn id(&self) -> i64 {
        self.0.id.unwrap_or_default()
    }
}

/// The viewer, if the request carries a known identity
#[derive(Debug, Clone)]
pub struct MaybeViewer(pub Option<User>);

async fn lookup(parts: &Parts, state: &ServerState) -> Result<Option<User>, ApiError> {
    let Some(username) = parts
        .headers
        .get(state.config.user_header.as_str())
        // Usernames may hold any word character, so decode raw UTF-8
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
    else {
        return Ok(None);
    };

    let user = with_db(state, move |conn| User::find_by_username(conn, &username)).await?;
    Ok(user)
}

#[axum::async_trait]
impl FromRequestParts<Arc<ServerState>> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerState>,
    ) -> Result<Self, Self::Rejection> {
        match lookup(parts, state).await? {
            Some(user) => Ok(Viewer(user)),
            None => Err(crate::Error::Unauthorized(format!(
                "A known username is required in the {} header",
                state.config.user_header
            ))
            .into()),
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<ServerState>> for MaybeViewer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ServerState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeViewer(lookup(parts, state).await?))
    }
}
