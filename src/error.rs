//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Bad credentials, missing or expired tokens
/// - **Resource Errors**: Requested resources not found
/// - **Business Logic Errors**: Operations that violate business rules
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed. Should not happen with valid bcrypt params.
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Access-token signing failed.
    ///
    /// Token *decoding* failures are mapped to [`AppError::InvalidToken`]
    /// instead, so this only covers encode-side errors.
    #[error("Token signing error: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),

    /// A blocking task (password hashing) panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Email or password did not match a registered account.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Bearer or refresh token is missing, malformed, expired, or revoked.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Authenticated user is not allowed to modify this resource.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Forbidden")]
    Forbidden,

    /// Requested user does not exist.
    #[error("User not found")]
    UserNotFound,

    /// Requested post does not exist.
    #[error("Post not found")]
    PostNotFound,

    /// Requested comment does not exist under the given post.
    #[error("Comment not found")]
    CommentNotFound,

    /// No like by the current user on the given post.
    #[error("Like not found")]
    LikeNotFound,

    /// Email address is already registered.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Email already registered")]
    EmailTaken,

    /// Current user already liked this post.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Already liked")]
    AlreadyLiked,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// JSON error envelope returned for every failed request.
///
/// ```json
/// {
///   "error": {
///     "code": "post_not_found",
///     "message": "Post not found"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Machine-readable code plus human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable error code (e.g., `invalid_token`)
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Map each error variant to (HTTP status, stable error code, message).
    ///
    /// Internal errors (database, hashing, signing) deliberately hide their
    /// details from the client; the full error is logged server-side.
    fn status_and_code(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "invalid_token", self.to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "user_not_found", self.to_string())
            }
            AppError::PostNotFound => {
                (StatusCode::NOT_FOUND, "post_not_found", self.to_string())
            }
            AppError::CommentNotFound => {
                (StatusCode::NOT_FOUND, "comment_not_found", self.to_string())
            }
            AppError::LikeNotFound => {
                (StatusCode::NOT_FOUND, "like_not_found", self.to_string())
            }
            AppError::EmailTaken => (StatusCode::CONFLICT, "email_taken", self.to_string()),
            AppError::AlreadyLiked => (StatusCode::CONFLICT, "already_liked", self.to_string()),
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(_)
            | AppError::PasswordHash(_)
            | AppError::TokenSigning(_)
            | AppError::TaskJoin(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_and_code();

        // Internal failures are logged with full detail before being masked
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed with internal error");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(
            AppError::InvalidCredentials.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidToken.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn not_found_errors_map_to_404() {
        for err in [
            AppError::UserNotFound,
            AppError::PostNotFound,
            AppError::CommentNotFound,
            AppError::LikeNotFound,
        ] {
            assert_eq!(err.status_and_code().0, StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn conflict_errors_map_to_409() {
        assert_eq!(AppError::EmailTaken.status_and_code().0, StatusCode::CONFLICT);
        assert_eq!(
            AppError::AlreadyLiked.status_and_code().0,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_error_keeps_its_message() {
        let (status, code, message) =
            AppError::InvalidRequest("title must not be empty".to_string()).status_and_code();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "invalid_request");
        assert_eq!(message, "title must not be empty");
    }

    #[test]
    fn internal_errors_hide_details() {
        let (status, code, message) =
            AppError::Database(sqlx::Error::PoolClosed).status_and_code();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "internal_error");
        assert!(!message.contains("Pool"));
    }
}
