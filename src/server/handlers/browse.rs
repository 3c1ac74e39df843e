// src/server/handlers/browse.rs
//! Welcome page handler

use super::{ApiError, render, with_db};
use crate::browse::{self, BrowseQuery};
use crate::server::{MaybeViewer, ServerState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

/// GET /
///
/// Open to anonymous visitors; `filter=following` needs a viewer.
pub async fn welcome(
    State(state): State<Arc<ServerState>>,
    MaybeViewer(viewer): MaybeViewer,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, ApiError> {
    let view = with_db(&state, move |conn| {
        browse::build_welcome(conn, viewer.as_ref(), &query)
    })
    .await?;
    Ok(render(StatusCode::OK, &view))
}
