// src/server/handlers/mod.rs
//! HTTP request handlers for the Potluck server

pub mod browse;
pub mod recipes;
pub mod social;
pub mod users;

use crate::server::ServerState;
use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

/// Failure of a request, rendered as `{"error": kind, "message": text}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Potluck(#[from] crate::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Potluck(err) => match err {
                crate::Error::NotFoundError(_) => StatusCode::NOT_FOUND,
                crate::Error::Forbidden(_) => StatusCode::FORBIDDEN,
                crate::Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                crate::Error::AlreadyExists(_) => StatusCode::CONFLICT,
                crate::Error::ParseError(_) => StatusCode::BAD_REQUEST,
                crate::Error::DatabaseError(_)
                | crate::Error::IoError(_)
                | crate::Error::InitError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Potluck(err) => err.kind(),
            ApiError::Task(_) => "task_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, self);
        }

        let body = serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Run database work on the blocking pool with a fresh connection
pub(crate) async fn with_db<T, F>(state: &ServerState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Connection) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db_path = state.config.db_path.clone();
    let value = tokio::task::spawn_blocking(move || {
        let mut conn = crate::db::open(&db_path)?;
        f(&mut conn)
    })
    .await??;
    Ok(value)
}

/// A view context as a JSON response
pub(crate) fn render<T: Serialize>(status: StatusCode, view: &T) -> Response {
    (status, Json(view)).into_response()
}

/// The page that linked here, for "back" redirects
pub(crate) fn referer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(crate::Error::NotFoundError("recipe 9".to_string()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.kind(), "not_found");

        let forbidden = ApiError::from(crate::Error::Forbidden("nope".to_string()));
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let io = ApiError::from(crate::Error::IoError(std::io::Error::other("disk")));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_referer() {
        let mut headers = HeaderMap::new();
        assert_eq!(referer(&headers), None);

        headers.insert(header::REFERER, HeaderValue::from_static("/profile/"));
        assert_eq!(referer(&headers).as_deref(), Some("/profile/"));
    }
}
