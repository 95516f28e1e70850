//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SECRET_KEY` (required): JWT signing secret (generate with the `genkey` run mode)
/// - `PASSWORD_PEPPER` (required): secret mixed into every password before hashing
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8000
/// - `ACCESS_TOKEN_EXPIRE_MINUTES` (optional): access-token lifetime, defaults to 30
/// - `REFRESH_TOKEN_EXPIRE_DAYS` (optional): refresh-session lifetime, defaults to 7
/// - `COOKIE_SECURE` (optional): `Secure` attribute on the refresh cookie, defaults to true
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    /// HS256 signing secret for access tokens.
    pub secret_key: String,

    /// Server-side secret combined with every password before bcrypt.
    ///
    /// Losing this value invalidates every stored password hash.
    pub password_pepper: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,

    #[serde(default = "default_refresh_token_expire_days")]
    pub refresh_token_expire_days: i64,

    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8000
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_refresh_token_expire_days() -> i64 {
    7
}

fn default_cookie_secure() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., SECRET_KEY, PASSWORD_PEPPER)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> Vec<(String, String)> {
        vec![
            ("DATABASE_URL".into(), "postgres://localhost/community".into()),
            ("SECRET_KEY".into(), "s".repeat(64)),
            ("PASSWORD_PEPPER".into(), "p".repeat(64)),
        ]
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config: Config = envy::from_iter(base_vars()).unwrap();

        assert_eq!(config.server_port, 8000);
        assert_eq!(config.access_token_expire_minutes, 30);
        assert_eq!(config.refresh_token_expire_days, 7);
        assert!(config.cookie_secure);
    }

    #[test]
    fn optional_vars_override_defaults() {
        let mut vars = base_vars();
        vars.push(("SERVER_PORT".into(), "3000".into()));
        vars.push(("ACCESS_TOKEN_EXPIRE_MINUTES".into(), "5".into()));
        vars.push(("COOKIE_SECURE".into(), "false".into()));

        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.access_token_expire_minutes, 5);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn missing_required_secret_is_an_error() {
        let vars = vec![(
            "DATABASE_URL".to_string(),
            "postgres://localhost/community".to_string(),
        )];

        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
