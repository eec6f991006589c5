/// Input validators for account requests.
/// Enforces the field rules the handlers rely on before anything touches
/// the database: length windows, character classes, and control-character
/// rejection.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 20;
const MIN_PASSWORD_LENGTH: usize = 4;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_DESCRIPTION_LENGTH: usize = 256;

lazy_static! {
    // Letters, digits and underscore only; no whitespace, no punctuation.
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
}

/// Validates a username.
/// - 3 to 20 characters
/// - alphanumeric and underscore only
pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("username".to_string()));
    }

    if trimmed.len() < MIN_USERNAME_LENGTH {
        return Err(ValidationError::TooShort(
            "username".to_string(),
            MIN_USERNAME_LENGTH,
        ));
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong(
            "username".to_string(),
            MAX_USERNAME_LENGTH,
        ));
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("username".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a password.
/// - 4 to 128 characters
/// - no control characters
pub fn is_valid_password(password: &str) -> Result<String, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort(
            "password".to_string(),
            MIN_PASSWORD_LENGTH,
        ));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        ));
    }

    if password.chars().any(|c| c.is_control()) {
        return Err(ValidationError::SuspiciousContent("password".to_string()));
    }

    Ok(password.to_string())
}

/// Validates a user description. Empty is allowed.
pub fn is_valid_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();

    if trimmed.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong(
            "description".to_string(),
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    if trimmed.contains('\0') || trimmed.chars().any(|c| c.is_control() && c != '\n') {
        return Err(ValidationError::SuspiciousContent(
            "description".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(is_valid_username("alice").is_ok());
        assert!(is_valid_username("bob_42").is_ok());
        assert!(is_valid_username("ABC").is_ok());
    }

    #[test]
    fn test_username_length_limits() {
        assert!(is_valid_username("ab").is_err());
        assert!(is_valid_username(&"a".repeat(21)).is_err());
        assert!(is_valid_username("").is_err());
    }

    #[test]
    fn test_username_character_class() {
        assert!(is_valid_username("al ice").is_err());
        assert!(is_valid_username("alice!").is_err());
        assert!(is_valid_username("alice;--").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(is_valid_password("hunter2Plus").is_ok());
        assert!(is_valid_password("1234").is_ok());
    }

    #[test]
    fn test_password_length_limits() {
        assert!(is_valid_password("abc").is_err());
        assert!(is_valid_password(&"a".repeat(129)).is_err());
        assert!(is_valid_password("").is_err());
    }

    #[test]
    fn test_password_control_characters() {
        assert!(is_valid_password("pass\0word").is_err());
        assert!(is_valid_password("pass\tword").is_err());
    }

    #[test]
    fn test_description_limits() {
        assert!(is_valid_description("").is_ok());
        assert!(is_valid_description("regular account").is_ok());
        assert!(is_valid_description(&"a".repeat(257)).is_err());
        assert!(is_valid_description("bad\0bytes").is_err());
    }
}
