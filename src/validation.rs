//! Request field validation rules.
//!
//! Every rule returns `AppError::InvalidRequest` with a message describing
//! the violated constraint, so handlers can simply `?` them before touching
//! the database.
//!
//! # Rules
//!
//! - **email**: structural check (single `@`, dotted domain, no whitespace, ≤254 chars)
//! - **password**: 8–16 chars; at least one uppercase, lowercase, digit, and
//!   ASCII punctuation character; nothing outside those classes
//! - **nickname**: 1–10 ASCII alphanumeric chars (surrounding whitespace trimmed)
//! - **title**: 1–55 chars (trimmed)
//! - **content**: 1–2000 chars (trimmed)
//! - **search query**: 1–20 chars (trimmed)
//! - **profile image**: at most 500 chars
//! - **page**: 1–10000

use crate::error::AppError;

pub const TITLE_MAX_CHARS: usize = 55;
pub const CONTENT_MAX_CHARS: usize = 2000;
pub const SEARCH_MAX_CHARS: usize = 20;
pub const PAGE_MAX: i64 = 10_000;

fn invalid(message: &str) -> AppError {
    AppError::InvalidRequest(message.to_string())
}

/// Structural email check.
///
/// Not a full RFC 5321 parser; rejects the obviously malformed while leaving
/// real deliverability to the mail system.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let err = || invalid("email address is not valid");

    if email.is_empty() || email.len() > 254 {
        return Err(err());
    }
    if email.chars().any(char::is_whitespace) {
        return Err(err());
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(err()),
    };

    if local.is_empty() || domain.is_empty() {
        return Err(err());
    }
    // Domain needs at least one label separator, and no empty labels
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(err());
    }

    Ok(())
}

/// Password policy: 8–16 chars drawn from ASCII letters, digits, and
/// punctuation, with at least one character from each class.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let err = || {
        invalid(
            "password must be 8-16 characters and include uppercase, lowercase, \
             digit, and special characters",
        )
    };

    let len = password.chars().count();
    if !(8..=16).contains(&len) {
        return Err(err());
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        match c {
            'A'..='Z' => has_upper = true,
            'a'..='z' => has_lower = true,
            '0'..='9' => has_digit = true,
            c if c.is_ascii_punctuation() => has_special = true,
            // Anything else (whitespace, non-ASCII) is rejected outright
            _ => return Err(err()),
        }
    }

    if has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(err())
    }
}

/// Nickname: 1–10 ASCII alphanumeric characters.
///
/// Returns the trimmed nickname on success so callers store the canonical form.
pub fn validate_nickname(nickname: &str) -> Result<String, AppError> {
    let trimmed = nickname.trim();

    if trimmed.is_empty() || trimmed.chars().count() > 10 {
        return Err(invalid("nickname must be 1-10 characters"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("nickname may only contain letters and digits"));
    }

    Ok(trimmed.to_string())
}

/// Post title: 1–55 characters after trimming.
pub fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    let len = trimmed.chars().count();

    if len == 0 || len > TITLE_MAX_CHARS {
        return Err(invalid("title must be 1-55 characters"));
    }

    Ok(trimmed.to_string())
}

/// Post or comment body: 1–2000 characters after trimming.
pub fn validate_content(content: &str) -> Result<String, AppError> {
    let trimmed = content.trim();
    let len = trimmed.chars().count();

    if len == 0 || len > CONTENT_MAX_CHARS {
        return Err(invalid("content must be 1-2000 characters"));
    }

    Ok(trimmed.to_string())
}

/// Search term: 1–20 characters after trimming.
pub fn validate_search_query(q: &str) -> Result<String, AppError> {
    let trimmed = q.trim();
    let len = trimmed.chars().count();

    if len == 0 || len > SEARCH_MAX_CHARS {
        return Err(invalid("search query must be 1-20 characters"));
    }

    Ok(trimmed.to_string())
}

/// Profile image reference: bounded length only, content is opaque to us.
pub fn validate_profile_img(profile_img: &str) -> Result<(), AppError> {
    if profile_img.chars().count() > 500 {
        return Err(invalid("profile_img must be at most 500 characters"));
    }
    Ok(())
}

/// Page number: 1–10000.
pub fn validate_page(page: i64) -> Result<(), AppError> {
    if !(1..=PAGE_MAX).contains(&page) {
        return Err(invalid("page must be between 1 and 10000"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normal_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.co.kr").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        for email in [
            "",
            "no-at-sign",
            "two@@example.com",
            "a@b@c.com",
            "@example.com",
            "user@",
            "user@nodot",
            "user@bad..dot",
            "user name@example.com",
        ] {
            assert!(validate_email(email).is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn accepts_policy_conformant_password() {
        assert!(validate_password("Test1234!").is_ok());
        assert!(validate_password("Aa1!Aa1!Aa1!Aa1!").is_ok());
    }

    #[test]
    fn rejects_password_missing_a_class() {
        // no special
        assert!(validate_password("Test1234").is_err());
        // no digit
        assert!(validate_password("Testtest!").is_err());
        // no uppercase
        assert!(validate_password("test1234!").is_err());
        // no lowercase
        assert!(validate_password("TEST1234!").is_err());
    }

    #[test]
    fn rejects_password_out_of_length_bounds() {
        assert!(validate_password("Aa1!bcd").is_err()); // 7 chars
        assert!(validate_password("Aa1!Aa1!Aa1!Aa1!x").is_err()); // 17 chars
    }

    #[test]
    fn rejects_password_with_forbidden_characters() {
        assert!(validate_password("Test 1234!").is_err()); // space
        assert!(validate_password("Test1234!한").is_err()); // non-ASCII
    }

    #[test]
    fn nickname_is_trimmed_and_bounded() {
        assert_eq!(validate_nickname("  Tester1 ").unwrap(), "Tester1");
        assert!(validate_nickname("").is_err());
        assert!(validate_nickname("   ").is_err());
        assert!(validate_nickname("ElevenChars").is_err());
        assert!(validate_nickname("bad name").is_err());
        assert!(validate_nickname("hyphen-no").is_err());
    }

    #[test]
    fn title_and_content_bounds() {
        assert!(validate_title(&"t".repeat(55)).is_ok());
        assert!(validate_title(&"t".repeat(56)).is_err());
        assert!(validate_title("  ").is_err());

        assert!(validate_content(&"c".repeat(2000)).is_ok());
        assert!(validate_content(&"c".repeat(2001)).is_err());
        assert!(validate_content("").is_err());
    }

    #[test]
    fn search_query_bounds() {
        assert_eq!(validate_search_query(" rust ").unwrap(), "rust");
        assert!(validate_search_query(" ").is_err());
        assert!(validate_search_query(&"q".repeat(21)).is_err());
    }

    #[test]
    fn page_bounds() {
        assert!(validate_page(1).is_ok());
        assert!(validate_page(10_000).is_ok());
        assert!(validate_page(0).is_err());
        assert!(validate_page(10_001).is_err());
    }
}
