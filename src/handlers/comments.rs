//! Comment HTTP handlers.
//!
//! This module implements the comment-related API endpoints:
//! - GET /posts/{post_id}/comments - List a post's comments
//! - POST /posts/{post_id}/comments - Create a comment
//! - PATCH /posts/{post_id}/comments/{comment_id} - Edit a comment (author only)
//! - DELETE /posts/{post_id}/comments/{comment_id} - Delete a comment (author only)
//! - GET /comments/me - Own comments

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
        comment::{
            CommentListResponse, CommentResponse, CreateCommentRequest, UpdateCommentRequest,
        },
        post::PageQuery,
    },
    services::comment_service,
    state::AppState,
};

pub static COMMENTS_TAG: &str = "COMMENTS";

/// List a post's comments in conversation order (oldest first).
#[utoipa::path(
    get,
    path = "/posts/{post_id}/comments",
    tag = COMMENTS_TAG,
    params(("post_id" = Uuid, Path, description = "Post id"), PageQuery),
    responses(
        (status = 200, description = "Paginated comment listing", body = CommentListResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    ),
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CommentListResponse>, AppError> {
    query.validate()?;

    let response = comment_service::list_comments(&state.pool, post_id, query.page).await?;

    Ok(Json(response))
}

/// Create a comment under a post.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/comments",
    tag = COMMENTS_TAG,
    security(("bearer_auth" = [])),
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    ),
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let content = request.validate()?;

    let comment =
        comment_service::create_comment(&state.pool, post_id, auth.user_id, &content).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Edit a comment. Author only.
#[utoipa::path(
    patch,
    path = "/posts/{post_id}/comments/{comment_id}",
    tag = COMMENTS_TAG,
    security(("bearer_auth" = [])),
    params(
        ("post_id" = Uuid, Path, description = "Post id"),
        ("comment_id" = Uuid, Path, description = "Comment id"),
    ),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = CommentResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse),
    ),
)]
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let content = request.validate()?;

    let comment = comment_service::update_comment(
        &state.pool,
        post_id,
        comment_id,
        auth.user_id,
        &content,
    )
    .await?;

    Ok(Json(comment))
}

/// Delete a comment. Author only.
#[utoipa::path(
    delete,
    path = "/posts/{post_id}/comments/{comment_id}",
    tag = COMMENTS_TAG,
    security(("bearer_auth" = [])),
    params(
        ("post_id" = Uuid, Path, description = "Post id"),
        ("comment_id" = Uuid, Path, description = "Comment id"),
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse),
    ),
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    comment_service::delete_comment(&state.pool, post_id, comment_id, auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the authenticated user's own comments, newest first.
#[utoipa::path(
    get,
    path = "/comments/me",
    tag = COMMENTS_TAG,
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated comment listing", body = CommentListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn list_my_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CommentListResponse>, AppError> {
    query.validate()?;

    let response = comment_service::list_my_comments(&state.pool, auth.user_id, query.page).await?;

    Ok(Json(response))
}
