//! Fixture-data seeding (`cloud-community seed`).
//!
//! Inserts the two well-known test accounts used by manual and automated
//! testing. Re-running is safe: accounts are upserted by email, never
//! duplicated.

use crate::{config::Config, db::DbPool, error::AppError, services::auth_service};

/// A fixture account inserted by the seed run mode.
pub struct FixtureAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub nickname: &'static str,
}

/// The two test accounts: primary and secondary.
pub const FIXTURE_ACCOUNTS: [FixtureAccount; 2] = [
    FixtureAccount {
        email: "test@example.com",
        password: "Test1234!",
        nickname: "TestUser",
    },
    FixtureAccount {
        email: "test2@example.com",
        password: "Test1234!",
        nickname: "TestUser2",
    },
];

/// Insert (or refresh) the fixture accounts.
///
/// The password hash is recomputed on every run, so seeding also repairs
/// fixture accounts after a `PASSWORD_PEPPER` change.
pub async fn run(pool: &DbPool, config: &Config) -> Result<(), AppError> {
    for account in &FIXTURE_ACCOUNTS {
        let password_hash =
            auth_service::hash_password(&config.password_pepper, account.password)?;

        sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, nickname)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                nickname = EXCLUDED.nickname
            "#,
        )
        .bind(account.email)
        .bind(&password_hash)
        .bind(account.nickname)
        .execute(pool)
        .await?;

        tracing::info!(
            email = account.email,
            nickname = account.nickname,
            "fixture account ready"
        );
    }

    tracing::info!("seed complete; login with test@example.com / Test1234!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation;

    #[test]
    fn fixture_accounts_are_distinct() {
        assert_ne!(FIXTURE_ACCOUNTS[0].email, FIXTURE_ACCOUNTS[1].email);
        assert_ne!(FIXTURE_ACCOUNTS[0].nickname, FIXTURE_ACCOUNTS[1].nickname);
    }

    #[test]
    fn fixture_credentials_satisfy_signup_policy() {
        // Seeded accounts must be creatable through the public API too
        for account in &FIXTURE_ACCOUNTS {
            validation::validate_email(account.email).unwrap();
            validation::validate_password(account.password).unwrap();
            validation::validate_nickname(account.nickname).unwrap();
        }
    }
}
