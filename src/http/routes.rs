use axum::{routing::get, routing::post, routing::put, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn auth() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/profile", get(handlers::get_profile))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route(
            "/api/posts",
            post(handlers::create_post).get(handlers::list_posts),
        )
        .route("/api/posts/my-posts", get(handlers::list_my_posts))
        .route(
            "/api/posts/:id",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        .route("/api/posts/:id/comments", post(handlers::create_comment))
        .route("/api/posts/:id/reaction", post(handlers::toggle_reaction))
}
