//! Bearer-token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the JWT from the Authorization header
//! 2. Verify its signature and expiry against `SECRET_KEY`
//! 3. Inject the authenticated user id into the request
//! 4. Reject unauthorized requests with HTTP 401
//!
//! Access tokens are self-contained: no database round-trip happens here.
//! Revocation granularity comes from the short access-token lifetime plus
//! the server-side refresh sessions.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::AppError, services::auth_service, state::AppState};

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    /// ID of the authenticated user, taken from the token's `sub` claim
    pub user_id: Uuid,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Extract a cookie's value from the `Cookie` request header.
///
/// Used by the token-refresh and logout endpoints to read the refresh
/// cookie; minimal RFC 6265 request-cookie parsing, no quoting support.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookies = headers.get("Cookie")?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Bearer-token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <jwt>` header from request
/// 2. Decode and validate the JWT (signature + expiry)
/// 3. If valid: inject `AuthContext` into request, call next handler
/// 4. If not: return 401 Unauthorized error
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::InvalidToken)?;

    let user_id = auth_service::decode_access_token(&state.config.secret_key, token)?;

    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_extracts_the_token() {
        let headers = headers_with("Authorization", "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_requires_the_scheme() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(
            bearer_token(&headers_with("Authorization", "Basic dXNlcg==")),
            None
        );
        assert_eq!(bearer_token(&headers_with("Authorization", "abc")), None);
    }

    #[test]
    fn cookie_value_finds_the_named_cookie() {
        let headers = headers_with("Cookie", "theme=dark; refresh_token=deadbeef; lang=ko");

        assert_eq!(cookie_value(&headers, "refresh_token"), Some("deadbeef"));
        assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
        assert_eq!(cookie_value(&headers, "lang"), Some("ko"));
    }

    #[test]
    fn cookie_value_misses_are_none() {
        let headers = headers_with("Cookie", "theme=dark");

        assert_eq!(cookie_value(&headers, "refresh_token"), None);
        assert_eq!(cookie_value(&HeaderMap::new(), "refresh_token"), None);
    }

    #[test]
    fn cookie_value_does_not_match_prefixes() {
        let headers = headers_with("Cookie", "refresh_token_old=aaa; refresh_token=bbb");

        assert_eq!(cookie_value(&headers, "refresh_token"), Some("bbb"));
    }
}
