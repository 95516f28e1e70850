//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Database entity representing an account
//! - `UserSession`: Database entity for a refresh-token session
//! - Request bodies for signup, login, and profile updates
//! - Response bodies returned to clients (never include the password hash)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, validation};

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. The `password_hash` column stores
/// `bcrypt(hex(HMAC-SHA256(pepper, password)))` and must never leave the
/// server; every response type below omits it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Login email, unique across all accounts
    pub email: String,

    /// bcrypt hash of the peppered password
    pub password_hash: String,

    /// Display name, 1-10 alphanumeric characters
    pub nickname: String,

    /// Optional profile image reference
    pub profile_img: Option<String>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

/// A refresh-token session row from `user_sessions`.
///
/// One row per device login. Only the SHA-256 hash of the refresh token is
/// stored; presenting a token whose hash matches proves possession.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSession {
    pub id: Uuid,

    /// Owner of this session
    pub user_id: Uuid,

    /// SHA-256 hex digest of the opaque refresh token
    pub refresh_token_hash: String,

    /// User-Agent captured at login, for session listings/debugging
    pub device_info: String,

    /// Session creation time; expiry is measured from here
    pub created_at: DateTime<Utc>,

    /// Last successful refresh with this session
    pub last_used_at: DateTime<Utc>,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "email": "test@example.com",
///   "password": "Test1234!",
///   "nickname": "TestUser",
///   "profile_img": null
/// }
/// ```
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,

    /// 8-16 chars; uppercase, lowercase, digit, and special character required
    pub password: String,

    /// 1-10 alphanumeric characters
    pub nickname: String,

    #[serde(default)]
    pub profile_img: Option<String>,
}

impl CreateUserRequest {
    /// Validate all fields, returning the canonical (trimmed) nickname.
    pub fn validate(&self) -> Result<String, AppError> {
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)?;
        let nickname = validation::validate_nickname(&self.nickname)?;
        if let Some(ref img) = self.profile_img {
            validation::validate_profile_img(img)?;
        }
        Ok(nickname)
    }
}

/// Response body after successful signup.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for CreateUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            created_at: user.created_at,
        }
    }
}

/// Request body for login.
///
/// The password is deliberately not validated against the signup policy here:
/// a policy change must not lock out existing accounts.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body carrying a fresh access token.
///
/// The refresh token travels separately as an HttpOnly cookie and never
/// appears in a JSON body.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token for the Authorization header
    pub access_token: String,
}

/// The authenticated user's own profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct MyProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for MyProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            profile_img: user.profile_img,
            created_at: user.created_at,
        }
    }
}

/// Request body for updating the current user's profile.
///
/// Both fields are optional but at least one must be present.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(default)]
    pub profile_img: Option<String>,
}

impl UpdateUserRequest {
    /// Validate fields and return the canonical nickname if one was given.
    pub fn validate(&self) -> Result<Option<String>, AppError> {
        if self.nickname.is_none() && self.profile_img.is_none() {
            return Err(AppError::InvalidRequest(
                "at least one of nickname or profile_img is required".to_string(),
            ));
        }
        if let Some(ref img) = self.profile_img {
            validation::validate_profile_img(img)?;
        }
        self.nickname
            .as_deref()
            .map(validation::validate_nickname)
            .transpose()
    }
}

/// Another user's public profile — no email, no timestamps.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct PublicProfileResponse {
    pub id: Uuid,
    pub nickname: String,
    pub profile_img: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_request_validates_all_fields() {
        let request = CreateUserRequest {
            email: "test@example.com".to_string(),
            password: "Test1234!".to_string(),
            nickname: " TestUser ".to_string(),
            profile_img: None,
        };

        assert_eq!(request.validate().unwrap(), "TestUser");
    }

    #[test]
    fn signup_request_rejects_weak_password() {
        let request = CreateUserRequest {
            email: "test@example.com".to_string(),
            password: "password".to_string(),
            nickname: "TestUser".to_string(),
            profile_img: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_requires_at_least_one_field() {
        let request = UpdateUserRequest {
            nickname: None,
            profile_img: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_with_only_profile_img_is_valid() {
        let request = UpdateUserRequest {
            nickname: None,
            profile_img: Some("https://cdn.example.com/avatar.png".to_string()),
        };

        assert_eq!(request.validate().unwrap(), None);
    }

    #[test]
    fn create_response_omits_sensitive_fields() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            nickname: "TestUser".to_string(),
            profile_img: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(CreateUserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("profile_img").is_none());
    }
}
