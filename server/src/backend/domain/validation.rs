//! Input checks shared by the services. All of them run before any storage
//! write.

use crate::backend::domain::error::{DomainError, DomainResult};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_REASON_LEN: usize = 500;

/// Trimmed, non-empty, at most `max_len` characters
pub fn required_text(value: &str, field: &str, max_len: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Like [`required_text`] but blank input becomes `None`
pub fn optional_text(value: Option<&str>, field: &str, max_len: usize) -> DomainResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => required_text(text, field, max_len).map(Some),
    }
}

pub fn points_in_range(points: u32, field: &str, min: u32, max: u32) -> DomainResult<u32> {
    if (min..=max).contains(&points) {
        Ok(points)
    } else {
        Err(DomainError::validation(format!(
            "{} must be between {} and {}",
            field, min, max
        )))
    }
}

/// Lowercased email after a shape check: one `@`, a non-empty local part
/// and a dotted domain
pub fn email(value: &str) -> DomainResult<String> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(DomainError::validation("Please enter a valid email address"))
    }
}

pub fn password(value: &str) -> DomainResult<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("  Dishes ", "Title", 10).unwrap(), "Dishes");
        assert!(required_text("   ", "Title", 10).is_err());
        assert!(required_text("abcdefghijk", "Title", 10).is_err());
        assert_eq!(optional_text(Some("  "), "Category", 10).unwrap(), None);
    }

    #[test]
    fn test_email_shape() {
        assert_eq!(email(" Mom@Example.COM ").unwrap(), "mom@example.com");
        for bad in ["", "mom", "@example.com", "mom@example", "mom@@example.com", "m om@example.com"] {
            assert!(email(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_password_and_points() {
        assert!(password("12345").is_err());
        assert!(password("123456").is_ok());
        assert!(points_in_range(0, "Points", 1, 100).is_err());
        assert!(points_in_range(101, "Points", 1, 100).is_err());
        assert_eq!(points_in_range(100, "Points", 1, 100).unwrap(), 100);
    }
}
