//! Like HTTP handlers.
//!
//! This module implements the like-related API endpoints:
//! - POST /posts/{post_id}/likes - Like a post
//! - DELETE /posts/{post_id}/likes - Remove the like
//! - GET /posts/{post_id}/likes - Like status for the current user
//! - GET /posts/liked - Posts the current user liked

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorResponse},
    middleware::auth::AuthContext,
    models::{
        like::{LikeStatusResponse, LikedPostsResponse},
        post::PageQuery,
    },
    services::like_service,
    state::AppState,
};

pub static LIKES_TAG: &str = "LIKES";

/// Like a post.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/likes",
    tag = LIKES_TAG,
    security(("bearer_auth" = [])),
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 201, description = "Like registered", body = LikeStatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 409, description = "Already liked", body = ErrorResponse),
    ),
)]
pub async fn create_like(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
) -> Result<(StatusCode, Json<LikeStatusResponse>), AppError> {
    let status = like_service::like_post(&state.pool, post_id, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(status)))
}

/// Remove the current user's like from a post.
#[utoipa::path(
    delete,
    path = "/posts/{post_id}/likes",
    tag = LIKES_TAG,
    security(("bearer_auth" = [])),
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like removed", body = LikeStatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Post or like not found", body = ErrorResponse),
    ),
)]
pub async fn delete_like(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeStatusResponse>, AppError> {
    let status = like_service::unlike_post(&state.pool, post_id, auth.user_id).await?;

    Ok(Json(status))
}

/// Like status of a post for the current user.
#[utoipa::path(
    get,
    path = "/posts/{post_id}/likes",
    tag = LIKES_TAG,
    security(("bearer_auth" = [])),
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like status", body = LikeStatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    ),
)]
pub async fn get_like_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeStatusResponse>, AppError> {
    let status = like_service::like_status(&state.pool, post_id, auth.user_id).await?;

    Ok(Json(status))
}

/// Posts the current user liked, most recently liked first.
#[utoipa::path(
    get,
    path = "/posts/liked",
    tag = LIKES_TAG,
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated liked-post listing", body = LikedPostsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn list_liked_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<LikedPostsResponse>, AppError> {
    query.validate()?;

    let response = like_service::list_liked_posts(&state.pool, auth.user_id, query.page).await?;

    Ok(Json(response))
}
