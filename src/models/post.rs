//! Post data models and API request/response types.
//!
//! This module defines:
//! - `ListPostsQuery`: search/sort/pagination query parameters
//! - Request bodies for creating and editing posts
//! - Response rows fetched straight from JOINed queries via `sqlx::FromRow`
//!
//! `view_count`, `like_count`, and `comment_count` are denormalized
//! counters on the `posts` table, updated in the same database transaction
//! as the change that moves them, so a single row read is enough to render
//! a post. `author_id` is NULL once the author deletes their account; the
//! post itself survives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{error::AppError, pagination::Pagination, validation};

/// Column a post listing can be sorted by.
///
/// Serialized as the lowercase column name (`?sort=like_count`). Mapping to
/// SQL goes through [`SortColumn::as_sql`] so user input never reaches the
/// query text directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    CreatedAt,
    ViewCount,
    LikeCount,
}

impl SortColumn {
    /// Hardcoded column name for ORDER BY — the allowlist that keeps the
    /// sort parameter injection-safe.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::CreatedAt => "created_at",
            SortColumn::ViewCount => "view_count",
            SortColumn::LikeCount => "like_count",
        }
    }
}

/// Sort direction for post listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query parameters for `GET /posts`.
///
/// # Example
///
/// `GET /posts?q=rust&sort=like_count&order=desc&page=2`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
    /// Search term matched against title and content (1-20 chars)
    #[serde(default)]
    pub q: Option<String>,

    /// Sort column, defaults to `created_at`
    #[serde(default)]
    pub sort: SortColumn,

    /// Sort direction, defaults to `desc`
    #[serde(default)]
    pub order: SortOrder,

    /// Page number (1-10000), defaults to 1
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

impl ListPostsQuery {
    /// Validate the page bound and the search term, returning the trimmed
    /// search term if one was given.
    pub fn validate(&self) -> Result<Option<String>, AppError> {
        validation::validate_page(self.page)?;
        self.q
            .as_deref()
            .map(validation::validate_search_query)
            .transpose()
    }
}

/// Query parameters for endpoints that only paginate (`?page=N`).
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-10000), defaults to 1
    #[serde(default = "default_page")]
    pub page: i64,
}

impl PageQuery {
    pub fn validate(&self) -> Result<(), AppError> {
        validation::validate_page(self.page)
    }
}

/// One row of a post listing, fetched with the author's nickname JOINed in.
///
/// `author_id`/`author_nickname` are null for posts whose author deleted
/// their account.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct PostListItem {
    pub id: Uuid,
    pub author_id: Option<Uuid>,
    pub author_nickname: Option<String>,
    pub title: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Full post detail, including the body.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct PostDetailResponse {
    pub id: Uuid,
    pub author_id: Option<Uuid>,
    pub author_nickname: Option<String>,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paginated post listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostListResponse {
    pub data: Vec<PostListItem>,
    pub pagination: Pagination,
}

/// Request body for creating a post.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    /// 1-55 characters
    pub title: String,

    /// 1-2000 characters
    pub content: String,
}

impl CreatePostRequest {
    /// Validate and return the canonical (trimmed) title and content.
    pub fn validate(&self) -> Result<(String, String), AppError> {
        let title = validation::validate_title(&self.title)?;
        let content = validation::validate_content(&self.content)?;
        Ok((title, content))
    }
}

/// Request body for editing a post. At least one field must be present.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

impl UpdatePostRequest {
    /// Validate and return the canonical values of the fields that were given.
    pub fn validate(&self) -> Result<(Option<String>, Option<String>), AppError> {
        if self.title.is_none() && self.content.is_none() {
            return Err(AppError::InvalidRequest(
                "at least one of title or content is required".to_string(),
            ));
        }
        let title = self.title.as_deref().map(validation::validate_title).transpose()?;
        let content = self
            .content
            .as_deref()
            .map(validation::validate_content)
            .transpose()?;
        Ok((title, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parameters_deserialize_from_query_names() {
        let query: ListPostsQuery =
            serde_json::from_value(serde_json::json!({"sort": "like_count", "order": "asc"}))
                .unwrap();

        assert_eq!(query.sort, SortColumn::LikeCount);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn sort_defaults_are_newest_first() {
        let query: ListPostsQuery = serde_json::from_value(serde_json::json!({})).unwrap();

        assert_eq!(query.sort, SortColumn::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
    }

    #[test]
    fn sort_column_maps_to_allowlisted_sql() {
        assert_eq!(SortColumn::CreatedAt.as_sql(), "created_at");
        assert_eq!(SortColumn::ViewCount.as_sql(), "view_count");
        assert_eq!(SortColumn::LikeCount.as_sql(), "like_count");
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let result =
            serde_json::from_value::<ListPostsQuery>(serde_json::json!({"sort": "password_hash"}));

        assert!(result.is_err());
    }

    #[test]
    fn list_query_validates_search_term() {
        let query = ListPostsQuery {
            q: Some("  rust  ".to_string()),
            sort: SortColumn::CreatedAt,
            order: SortOrder::Desc,
            page: 1,
        };

        assert_eq!(query.validate().unwrap().as_deref(), Some("rust"));
    }

    #[test]
    fn update_request_requires_a_field() {
        let request = UpdatePostRequest {
            title: None,
            content: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_trims_fields() {
        let request = CreatePostRequest {
            title: " hello ".to_string(),
            content: " world ".to_string(),
        };

        let (title, content) = request.validate().unwrap();
        assert_eq!(title, "hello");
        assert_eq!(content, "world");
    }
}
