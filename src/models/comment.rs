//! Comment data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, pagination::Pagination, validation};

/// A comment row with the author's nickname JOINed in.
///
/// Served both as a list element and as the body of create/update responses.
/// `updated_at` stays null until the comment is first edited.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Option<Uuid>,
    pub author_nickname: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Paginated comment listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentListResponse {
    pub data: Vec<CommentResponse>,
    pub pagination: Pagination,
}

/// Request body for creating a comment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    /// 1-2000 characters
    pub content: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<String, AppError> {
        validation::validate_content(&self.content)
    }
}

/// Request body for editing a comment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCommentRequest {
    /// 1-2000 characters
    pub content: String,
}

impl UpdateCommentRequest {
    pub fn validate(&self) -> Result<String, AppError> {
        validation::validate_content(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_content_is_trimmed_and_bounded() {
        let request = CreateCommentRequest {
            content: "  nice post  ".to_string(),
        };
        assert_eq!(request.validate().unwrap(), "nice post");

        let request = CreateCommentRequest {
            content: "x".repeat(2001),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn untouched_comment_serializes_null_updated_at() {
        let comment = CommentResponse {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            author_id: None,
            author_nickname: None,
            content: "hello".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&comment).unwrap();
        assert!(json["updated_at"].is_null());
        assert!(json["author_nickname"].is_null());
    }
}
