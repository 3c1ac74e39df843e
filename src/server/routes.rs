// src/server/routes.rs
//! Axum router configuration for the Potluck server

use crate::server::ServerState;
use crate::server::handlers::{browse, recipes, social, users};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

/// Create the main application router
pub fn create_router(state: Arc<ServerState>) -> Router {
    let media = ServeDir::new(&state.config.media_dir);

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(browse::welcome))
        // Recipe form
        .route(
            "/create_recipe/",
            get(recipes::create_form).post(recipes::create_submit),
        )
        .route(
            "/recipe/:id/edit/",
            get(recipes::edit_form).post(recipes::edit_submit),
        )
        .route(
            "/recipe/:id/delete/",
            get(recipes::delete_redirect).post(recipes::delete_submit),
        )
        // Detail page, ratings and favourites
        .route(
            "/recipes/:id/",
            get(recipes::detail_page).post(recipes::detail_submit),
        )
        .route("/recipes/:id/rate/", post(recipes::rate))
        .route("/recipes/:id/favourite/", post(social::favourite))
        .route("/recipes/:id/unfavourite/", post(social::unfavourite))
        .route("/favourites/", get(social::favourites))
        // Profiles
        .route("/profile/", get(users::own_profile))
        .route("/users/:id/", get(users::other_profile))
        .route("/users/:id/follow/", post(social::follow))
        .route("/users/:id/unfollow/", post(social::unfollow))
        .route(
            "/sign_up/",
            get(users::sign_up_form).post(users::sign_up_submit),
        )
        .nest_service("/media", media)
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Recipe, User};
    use crate::server::ServerConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("potluck.db");
        crate::db::init(&db_path).unwrap();

        let conn = crate::db::open(&db_path).unwrap();
        let mut alice = User::new(
            "@alice".to_string(),
            "Alice".to_string(),
            "Smith".to_string(),
            "alice@example.org".to_string(),
        );
        alice.insert(&conn).unwrap();
        Recipe::new(alice.id.unwrap(), "Soup".to_string(), "Hot".to_string())
            .insert(&conn)
            .unwrap();

        let config = ServerConfig {
            media_dir: dir.path().join("media"),
            db_path,
            ..ServerConfig::default()
        };
        (dir, create_router(Arc::new(ServerState::new(config))))
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_welcome_is_public() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["template"], "welcome.html");
        assert_eq!(json["count"], 1);
    }

    #[tokio::test]
    async fn test_login_required() {
        let (_dir, app) = test_app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/profile/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/profile/")
                    .header("X-Potluck-User", "@nobody")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_rate_rejects_get() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/recipes/1/rate/")
                    .header("X-Potluck-User", "@alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_favourites_redirect() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/favourites/")
                    .header("X-Potluck-User", "@alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/profile/?tab=favourites"
        );
    }
}
