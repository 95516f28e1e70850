//! User and authentication HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /users - Sign up
//! - POST /auth/tokens - Login (issues access token + refresh cookie)
//! - PUT /auth/tokens - Refresh the access token
//! - DELETE /auth/tokens - Logout (revokes the refresh session)
//! - GET/PATCH/DELETE /users/me - Own profile
//! - GET /users/{user_id} - Public profile
//!
//! Password hashing and verification run on the blocking thread pool:
//! bcrypt deliberately takes ~100ms and must not stall the async executor.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use tokio::task;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorResponse},
    middleware::auth::{AuthContext, cookie_value},
    models::user::{
        CreateUserRequest, CreateUserResponse, LoginRequest, MyProfileResponse,
        PublicProfileResponse, TokenResponse, UpdateUserRequest, User, UserSession,
    },
    services::auth_service,
    state::AppState,
};

pub static USERS_TAG: &str = "USERS";

/// Name of the HttpOnly cookie carrying the refresh token.
const REFRESH_COOKIE: &str = "refresh_token";

/// Longest User-Agent we persist per session.
const DEVICE_INFO_MAX: usize = 255;

/// Build the Set-Cookie value for the refresh token.
///
/// Scoped to `/auth` so the token only travels to the token endpoints,
/// HttpOnly so scripts can never read it.
fn refresh_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{REFRESH_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/auth; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Cookie value that deletes the refresh cookie on the client.
fn clear_refresh_cookie(secure: bool) -> String {
    refresh_cookie("", 0, secure)
}

/// Sign up a new account.
#[utoipa::path(
    post,
    path = "/users",
    tag = USERS_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = CreateUserResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let nickname = request.validate()?;

    // bcrypt is CPU-bound; hash off the async executor
    let pepper = state.config.password_pepper.clone();
    let password = request.password.clone();
    let password_hash =
        task::spawn_blocking(move || auth_service::hash_password(&pepper, &password)).await??;

    let inserted = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, nickname, profile_img)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, password_hash, nickname, profile_img, created_at
        "#,
    )
    .bind(&request.email)
    .bind(&password_hash)
    .bind(&nickname)
    .bind(&request.profile_img)
    .fetch_one(&state.pool)
    .await;

    let user = match inserted {
        Ok(user) => user,
        // Unique violation on the email column: account already exists
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::EmailTaken);
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login with email and password.
///
/// On success the response body carries a short-lived JWT access token and
/// the response sets an HttpOnly refresh cookie backed by a `user_sessions`
/// row. A failed login burns the same bcrypt work whether or not the email
/// exists, so timing does not leak which emails are registered.
#[utoipa::path(
    post,
    path = "/auth/tokens",
    tag = USERS_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, nickname, profile_img, created_at \
         FROM users WHERE email = $1",
    )
    .bind(&request.email)
    .fetch_optional(&state.pool)
    .await?;

    let pepper = state.config.password_pepper.clone();
    let password = request.password.clone();

    let Some(user) = user else {
        // Unknown email: do the bcrypt work anyway, then fail identically
        task::spawn_blocking(move || auth_service::burn_dummy_verification(&pepper, &password))
            .await?;
        return Err(AppError::InvalidCredentials);
    };

    let stored_hash = user.password_hash.clone();
    let valid = task::spawn_blocking(move || {
        auth_service::verify_password(&pepper, &password, &stored_hash)
    })
    .await??;

    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let access_token = auth_service::create_access_token(
        &state.config.secret_key,
        user.id,
        state.config.access_token_expire_minutes,
    )?;

    // Opaque refresh token: plaintext to the client, hash to the database
    let refresh_token = auth_service::random_hex_token();
    let device_info: String = headers
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .chars()
        .take(DEVICE_INFO_MAX)
        .collect();

    sqlx::query(
        "INSERT INTO user_sessions (user_id, refresh_token_hash, device_info) \
         VALUES ($1, $2, $3)",
    )
    .bind(user.id)
    .bind(auth_service::hash_refresh_token(&refresh_token))
    .bind(&device_info)
    .execute(&state.pool)
    .await?;

    tracing::info!(user_id = %user.id, "user logged in");

    let max_age = state.config.refresh_token_expire_days * 24 * 60 * 60;
    let cookie = refresh_cookie(&refresh_token, max_age, state.config.cookie_secure);

    Ok((
        [(SET_COOKIE, cookie)],
        Json(TokenResponse { access_token }),
    ))
}

/// Exchange a valid refresh cookie for a new access token.
#[utoipa::path(
    put,
    path = "/auth/tokens",
    tag = USERS_TAG,
    responses(
        (status = 200, description = "New access token issued", body = TokenResponse),
        (status = 401, description = "Refresh cookie missing, unknown, or expired", body = ErrorResponse),
    ),
)]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    let token = cookie_value(&headers, REFRESH_COOKIE).ok_or(AppError::InvalidToken)?;
    let token_hash = auth_service::hash_refresh_token(token);

    let session = sqlx::query_as::<_, UserSession>(
        "SELECT id, user_id, refresh_token_hash, device_info, created_at, last_used_at \
         FROM user_sessions WHERE refresh_token_hash = $1",
    )
    .bind(&token_hash)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::InvalidToken)?;

    // Sessions expire a fixed interval after creation, not after last use
    let expires_at = session.created_at + Duration::days(state.config.refresh_token_expire_days);
    if expires_at < Utc::now() {
        sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(session.id)
            .execute(&state.pool)
            .await?;
        return Err(AppError::InvalidToken);
    }

    sqlx::query("UPDATE user_sessions SET last_used_at = NOW() WHERE id = $1")
        .bind(session.id)
        .execute(&state.pool)
        .await?;

    let access_token = auth_service::create_access_token(
        &state.config.secret_key,
        session.user_id,
        state.config.access_token_expire_minutes,
    )?;

    Ok(Json(TokenResponse { access_token }))
}

/// Logout: revoke the refresh session and clear the cookie.
///
/// Always succeeds — logging out with a stale or missing cookie is not an
/// error worth reporting.
#[utoipa::path(
    delete,
    path = "/auth/tokens",
    tag = USERS_TAG,
    responses(
        (status = 204, description = "Session revoked, cookie cleared"),
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = cookie_value(&headers, REFRESH_COOKIE) {
        sqlx::query("DELETE FROM user_sessions WHERE refresh_token_hash = $1")
            .bind(auth_service::hash_refresh_token(token))
            .execute(&state.pool)
            .await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_refresh_cookie(state.config.cookie_secure))],
    ))
}

/// Get the authenticated user's own profile.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = USERS_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own profile", body = MyProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
    ),
)]
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MyProfileResponse>, AppError> {
    // The account can vanish while an access token is still valid
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, nickname, profile_img, created_at \
         FROM users WHERE id = $1",
    )
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(user.into()))
}

/// Update the authenticated user's nickname and/or profile image.
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = USERS_TAG,
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = MyProfileResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
    ),
)]
pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<MyProfileResponse>, AppError> {
    let nickname = request.validate()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET nickname = COALESCE($1, nickname),
            profile_img = COALESCE($2, profile_img)
        WHERE id = $3
        RETURNING id, email, password_hash, nickname, profile_img, created_at
        "#,
    )
    .bind(&nickname)
    .bind(&request.profile_img)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(user.into()))
}

/// Delete the authenticated user's account.
///
/// Sessions and likes are removed by the database; posts and comments stay
/// behind with a NULL author.
#[utoipa::path(
    delete,
    path = "/users/me",
    tag = USERS_TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse),
    ),
)]
pub async fn delete_my_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(auth.user_id)
        .execute(&state.pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::UserNotFound);
    }

    tracing::info!(user_id = %auth.user_id, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Get another user's public profile.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = USERS_TAG,
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfileResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let profile = sqlx::query_as::<_, PublicProfileResponse>(
        "SELECT id, nickname, profile_img FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_cookie_is_httponly_and_scoped_to_auth() {
        let cookie = refresh_cookie("abc123", 604800, true);

        assert!(cookie.starts_with("refresh_token=abc123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/auth"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.ends_with("Secure"));
    }

    #[test]
    fn insecure_config_drops_the_secure_attribute() {
        let cookie = refresh_cookie("abc123", 60, false);

        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_refresh_cookie(true);

        assert!(cookie.starts_with("refresh_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
