//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{auth, files, folders, public_links, shares, AppState};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let file_routes = Router::new()
        .route("/", post(files::upload).get(files::list))
        .route("/shared", get(files::shared))
        .route("/search", get(files::search))
        .route("/trash", get(files::trash))
        .route("/:id", delete(files::move_to_trash))
        .route("/:id/download", get(files::download))
        .route("/:id/star", post(files::star))
        .route("/:id/restore", post(files::restore))
        .route("/:id/permanent", delete(files::delete_permanent));

    let folder_routes = Router::new()
        .route("/", post(folders::create))
        .route("/search", get(folders::search))
        .route("/:id", get(folders::contents));

    let share_routes = Router::new().route(
        "/",
        post(shares::create).get(shares::list).delete(shares::revoke),
    );

    let link_routes = Router::new().route("/", post(public_links::create).get(public_links::list));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/files", file_routes)
        .nest("/folders", folder_routes)
        .nest("/shares", share_routes)
        .nest("/public-link", link_routes)
        .route("/public/:token", get(public_links::access));

    let max_upload_size = app_state.max_upload_size;

    // Clone jwt_state for the middleware closure
    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                }))
                .layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }
}
