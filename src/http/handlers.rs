use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::auth::AuthService;
use crate::app::engagement::EngagementService;
use crate::app::posts::PostService;
use crate::domain::engagement::{Comment, ReactionStatus};
use crate::domain::post::{Post, PostDetail};
use crate::domain::user::User;
use crate::http::extract::PostForm;
use crate::http::{AppError, AuthUser};
use crate::AppState;

const MAX_PASSWORD_LEN: usize = 128;
const MAX_COMMENT_LEN: usize = 1000;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn parse_page(query: &PaginationQuery) -> Result<(i64, i64), AppError> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    if page < 1 {
        return Err(AppError::bad_request("page must be at least 1"));
    }
    if !(1..=200).contains(&limit) {
        return Err(AppError::bad_request("limit must be between 1 and 200"));
    }
    Ok((page, limit))
}

fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name cannot be empty"));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::bad_request("email is invalid"));
    }
    if payload.password.trim().len() < 8 {
        return Err(AppError::bad_request("password must be at least 8 characters"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }
    if payload.password != payload.password_confirmation {
        return Err(AppError::bad_request("passwords do not match"));
    }

    let service = AuthService::new(state.db.clone(), state.paseto_key, state.token_ttl_hours);
    let authenticated = service
        .register(payload.name, payload.email, payload.password)
        .await
        .map_err(|err| {
            if let Some(sqlx_err) = err.downcast_ref::<sqlx::Error>() {
                if let Some(db_err) = sqlx_err.as_database_error() {
                    if db_err.code().as_deref() == Some("23505") {
                        return AppError::conflict("email already exists");
                    }
                }
            }
            tracing::error!(error = ?err, "failed to register user");
            AppError::internal("failed to register user")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: authenticated.token,
            user: authenticated.user,
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if payload.email.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }

    let service = AuthService::new(state.db.clone(), state.paseto_key, state.token_ttl_hours);
    let authenticated = service
        .login(&payload.email, &payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to login");
            AppError::internal("failed to login")
        })?;

    match authenticated {
        Some(authenticated) => Ok(Json(AuthResponse {
            token: authenticated.token,
            user: authenticated.user,
        })),
        None => Err(AppError::unauthorized("invalid credentials")),
    }
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

// Tokens are stateless; logout is a client-side discard and there is no
// server-side blacklist to update.
pub async fn logout(_auth: AuthUser) -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Logged out successfully",
    })
}

pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let service = AuthService::new(state.db.clone(), state.paseto_key, state.token_ttl_hours);
    let user = service.get_current_user(auth.user_id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = auth.user_id, "failed to fetch profile");
        AppError::internal("failed to fetch profile")
    })?;

    match user {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::not_found("user not found")),
    }
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    form: PostForm,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let title = form.title.as_deref().unwrap_or("").trim().to_string();
    let content = form.content.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() || content.is_empty() {
        return Err(AppError::bad_request("title and content are required"));
    }

    let service = PostService::new(state.db.clone());
    let post = service
        .create_post(auth.user_id, title, content, form.image)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = auth.user_id, "failed to create post");
            AppError::internal("failed to create post")
        })?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    form: PostForm,
) -> Result<Json<Post>, AppError> {
    let service = PostService::new(state.db.clone());
    let owner = service.post_owner(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to fetch post");
        AppError::internal("failed to update post")
    })?;

    let owner = owner.ok_or_else(|| AppError::not_found("post not found"))?;
    if owner != auth.user_id {
        return Err(AppError::forbidden("access denied"));
    }

    let post = service
        .update_post(id, form.title, form.content, form.image)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, post_id = id, "failed to update post");
            AppError::internal("failed to update post")
        })?;

    match post {
        Some(post) => Ok(Json(post)),
        None => Err(AppError::not_found("post not found")),
    }
}

pub async fn delete_post(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let service = PostService::new(state.db.clone());
    let owner = service.post_owner(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to fetch post");
        AppError::internal("failed to delete post")
    })?;

    let owner = owner.ok_or_else(|| AppError::not_found("post not found"))?;
    if owner != auth.user_id {
        return Err(AppError::forbidden("access denied"));
    }

    let deleted = service.delete_post(id).await.map_err(|err| {
        tracing::error!(error = ?err, post_id = id, "failed to delete post");
        AppError::internal("failed to delete post")
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("post not found"))
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<PostDetail>>, AppError> {
    let (page, limit) = parse_page(&query)?;

    let service = PostService::new(state.db.clone());
    let posts = service.list_posts(page, limit).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list posts");
        AppError::internal("failed to list posts")
    })?;

    Ok(Json(posts))
}

pub async fn list_my_posts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<PostDetail>>, AppError> {
    let (page, limit) = parse_page(&query)?;

    let service = PostService::new(state.db.clone());
    let posts = service
        .list_posts_by_user(auth.user_id, page, limit)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = auth.user_id, "failed to list posts");
            AppError::internal("failed to list posts")
        })?;

    Ok(Json(posts))
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

pub async fn create_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    if payload.content.trim().is_empty() {
        return Err(AppError::bad_request("content cannot be empty"));
    }
    if payload.content.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::bad_request("content exceeds 1000 characters"));
    }

    let service = EngagementService::new(state.db.clone());
    let comment = service
        .create_comment(auth.user_id, id, payload.content)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = auth.user_id, post_id = id, "failed to comment");
            AppError::internal("failed to comment")
        })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Serialize)]
pub struct ReactionResponse {
    pub status: ReactionStatus,
}

pub async fn toggle_reaction(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ReactionResponse>, AppError> {
    let service = EngagementService::new(state.db.clone());
    let status = service
        .toggle_reaction(auth.user_id, id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, user_id = auth.user_id, post_id = id, "failed to toggle reaction");
            AppError::internal("failed to toggle reaction")
        })?;

    Ok(Json(ReactionResponse { status }))
}
