//! Like data models and API response types.
//!
//! Likes have no request body: the (post, user) pair in the URL and the
//! bearer token carry everything needed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::pagination::Pagination;

/// Like state of a post for the current user.
///
/// Returned from like, unlike, and status endpoints alike, so the client can
/// update its UI from any of them with one code path.
#[derive(Debug, Serialize, ToSchema)]
pub struct LikeStatusResponse {
    /// Whether the current user likes the post after this operation
    pub liked: bool,

    /// Total likes on the post
    pub like_count: i64,
}

/// One row of the "posts I liked" listing, ordered by like time.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct LikedPostItem {
    pub post_id: Uuid,
    pub author_id: Option<Uuid>,
    pub author_nickname: Option<String>,
    pub title: String,
    pub view_count: i64,
    pub like_count: i64,

    /// When the post was created (not when it was liked)
    pub created_at: DateTime<Utc>,
}

/// Paginated liked-posts listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct LikedPostsResponse {
    pub data: Vec<LikedPostItem>,
    pub pagination: Pagination,
}
