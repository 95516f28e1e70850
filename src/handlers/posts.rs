//! Post HTTP handlers.
//!
//! This module implements the post-related API endpoints:
//! - GET /posts - List, search, and sort posts
//! - POST /posts - Create a post
//! - GET /posts/me - Own posts
//! - GET /posts/{post_id} - Post detail (counts the view)
//! - PATCH /posts/{post_id} - Edit a post (author only)
//! - DELETE /posts/{post_id} - Delete a post (author only)

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorResponse},
    middleware::auth::AuthContext,
    models::post::{
        CreatePostRequest, ListPostsQuery, PageQuery, PostDetailResponse, PostListResponse,
        UpdatePostRequest,
    },
    services::post_service,
    state::AppState,
};

pub static POSTS_TAG: &str = "POSTS";

/// List posts with optional search and sorting.
#[utoipa::path(
    get,
    path = "/posts",
    tag = POSTS_TAG,
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Paginated post listing", body = PostListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
    ),
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let search = query.validate()?;

    let response = post_service::list_posts(
        &state.pool,
        search.as_deref(),
        query.sort,
        query.order,
        query.page,
    )
    .await?;

    Ok(Json(response))
}

/// Create a new post.
#[utoipa::path(
    post,
    path = "/posts",
    tag = POSTS_TAG,
    security(("bearer_auth" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostDetailResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostDetailResponse>), AppError> {
    let (title, content) = request.validate()?;

    let post = post_service::create_post(&state.pool, auth.user_id, &title, &content).await?;

    tracing::info!(post_id = %post.id, author_id = %auth.user_id, "post created");

    Ok((StatusCode::CREATED, Json(post)))
}

/// List the authenticated user's own posts, newest first.
#[utoipa::path(
    get,
    path = "/posts/me",
    tag = POSTS_TAG,
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated post listing", body = PostListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
)]
pub async fn list_my_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    query.validate()?;

    let response = post_service::list_my_posts(&state.pool, auth.user_id, query.page).await?;

    Ok(Json(response))
}

/// Get a single post and count the view.
#[utoipa::path(
    get,
    path = "/posts/{post_id}",
    tag = POSTS_TAG,
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post detail", body = PostDetailResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    ),
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let post = post_service::read_post(&state.pool, post_id).await?;

    Ok(Json(post))
}

/// Edit a post's title and/or content. Author only.
#[utoipa::path(
    patch,
    path = "/posts/{post_id}",
    tag = POSTS_TAG,
    security(("bearer_auth" = [])),
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostDetailResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    ),
)]
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let (title, content) = request.validate()?;

    let post = post_service::update_post(
        &state.pool,
        post_id,
        auth.user_id,
        title.as_deref(),
        content.as_deref(),
    )
    .await?;

    Ok(Json(post))
}

/// Delete a post. Author only.
#[utoipa::path(
    delete,
    path = "/posts/{post_id}",
    tag = POSTS_TAG,
    security(("bearer_auth" = [])),
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
    ),
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(post_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    post_service::delete_post(&state.pool, post_id, auth.user_id).await?;

    tracing::info!(post_id = %post_id, user_id = %auth.user_id, "post deleted");

    Ok(StatusCode::NO_CONTENT)
}
