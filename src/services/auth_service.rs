//! Authentication primitives: password hashing, access tokens, refresh tokens.
//!
//! # Password scheme
//!
//! Passwords are stored as `bcrypt(hex(HMAC-SHA256(pepper, password)))`:
//!
//! 1. The HMAC prehash keeps the bcrypt input at 64 hex chars, under
//!    bcrypt's 72-byte truncation limit regardless of password length.
//! 2. The pepper is a server-side secret, so a stolen `users` table cannot
//!    be cracked offline without also stealing the application environment.
//!
//! # Tokens
//!
//! - Access tokens are short-lived JWTs (HS256) carrying the user id in
//!   `sub` and an `exp` claim.
//! - Refresh tokens are opaque 32-byte random hex strings. The server keeps
//!   only their SHA-256 hash, the client keeps the plaintext in an HttpOnly
//!   cookie.

use std::sync::OnceLock;

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID) the token was issued to
    pub sub: String,

    /// Expiry as a unix timestamp; enforced by `jsonwebtoken` on decode
    pub exp: i64,
}

/// HMAC-SHA256 prehash of the password under the pepper, hex-encoded.
fn prehash(pepper: &str, password: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(pepper.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Hash a plaintext password for storage.
pub fn hash_password(pepper: &str, password: &str) -> Result<String, AppError> {
    let prehashed = prehash(pepper, password);
    Ok(bcrypt::hash(prehashed, bcrypt::DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(pepper: &str, password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let prehashed = prehash(pepper, password);
    Ok(bcrypt::verify(prehashed, stored_hash)?)
}

/// Burn one bcrypt verification against a fixed dummy hash.
///
/// Called on login when the email is unknown, so "no such user" and "wrong
/// password" take the same time and response timing does not reveal which
/// emails are registered.
pub fn burn_dummy_verification(pepper: &str, password: &str) {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| {
        bcrypt::hash("dummy_password_for_timing_uniformity", bcrypt::DEFAULT_COST)
            .unwrap_or_default()
    });

    // Result is irrelevant; only the work matters
    let _ = bcrypt::verify(prehash(pepper, password), dummy);
}

/// Create a signed access token for `user_id`, valid for `expire_minutes`.
pub fn create_access_token(
    secret: &str,
    user_id: Uuid,
    expire_minutes: i64,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::minutes(expire_minutes)).timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Decode and validate an access token, returning the user id it carries.
///
/// Any failure (bad signature, expired, malformed `sub`) collapses to
/// `InvalidToken`; the client learns nothing beyond "get a new token".
pub fn decode_access_token(secret: &str, token: &str) -> Result<Uuid, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Uuid::parse_str(&token_data.claims.sub).map_err(|_| AppError::InvalidToken)
}

/// Generate a 32-byte random token, hex-encoded (64 chars).
///
/// Used for refresh tokens and for the `genkey` run mode that mints
/// `SECRET_KEY` / `PASSWORD_PEPPER` values.
pub fn random_hex_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hex digest of a refresh token, as stored in `user_sessions`.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEPPER: &str = "unit-test-pepper";

    #[test]
    fn password_roundtrip_verifies() {
        let hash = hash_password(PEPPER, "Test1234!").unwrap();

        assert!(verify_password(PEPPER, "Test1234!", &hash).unwrap());
        assert!(!verify_password(PEPPER, "Test1234?", &hash).unwrap());
    }

    #[test]
    fn wrong_pepper_fails_verification() {
        let hash = hash_password(PEPPER, "Test1234!").unwrap();

        assert!(!verify_password("other-pepper", "Test1234!", &hash).unwrap());
    }

    #[test]
    fn long_passwords_are_not_truncated_alike() {
        // Raw bcrypt truncates at 72 bytes; the prehash must keep these apart.
        let long_a = "A".repeat(100) + "a1!";
        let long_b = "A".repeat(100) + "b2?";

        let hash = hash_password(PEPPER, &long_a).unwrap();
        assert!(verify_password(PEPPER, &long_a, &hash).unwrap());
        assert!(!verify_password(PEPPER, &long_b, &hash).unwrap());
    }

    #[test]
    fn access_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_access_token("secret", user_id, 30).unwrap();

        assert_eq!(decode_access_token("secret", &token).unwrap(), user_id);
    }

    #[test]
    fn access_token_rejects_wrong_secret() {
        let token = create_access_token("secret", Uuid::new_v4(), 30).unwrap();

        assert!(matches!(
            decode_access_token("other", &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn expired_access_token_is_rejected() {
        // Negative lifetime puts exp well past the default leeway
        let token = create_access_token("secret", Uuid::new_v4(), -60).unwrap();

        assert!(matches!(
            decode_access_token("secret", &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            decode_access_token("secret", "not.a.jwt"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn random_hex_token_shape() {
        let token = random_hex_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, random_hex_token());
    }

    #[test]
    fn refresh_token_hash_is_stable_sha256() {
        let token = "deadbeef";

        assert_eq!(hash_refresh_token(token), hash_refresh_token(token));
        assert_eq!(hash_refresh_token(token).len(), 64);
        assert_ne!(hash_refresh_token(token), hash_refresh_token("deadbeee"));
    }
}
