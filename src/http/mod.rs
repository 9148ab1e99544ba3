use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::ServeDir;

use crate::AppState;

mod auth;
mod error;
mod extract;
mod handlers;
mod routes;

pub use auth::AuthUser;
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    let uploads_dir = state.uploads.dir().to_path_buf();
    let body_limit = state.upload_max_bytes.max(0) as usize;

    Router::new()
        .merge(routes::health())
        .merge(routes::auth())
        .merge(routes::posts())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
