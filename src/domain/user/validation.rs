//! User validation utilities

use thiserror::Error;
use validator::ValidateEmail;

use crate::domain::DomainError;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Username '{0}' is reserved")]
    ReservedUsername(String),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("Language code exceeds maximum length of {0} characters")]
    LanguageTooLong(usize),
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

const MIN_USERNAME_LENGTH: usize = 4;
const MAX_USERNAME_LENGTH: usize = 30;
const MAX_LANGUAGE_LENGTH: usize = 6;

/// Usernames that collide with application routes
pub const DEFAULT_RESERVED_USERNAMES: &[&str] =
    &["logout", "login", "auth", "api", "admin", "account", "user"];

/// Validate a username
///
/// Rules:
/// - Cannot be empty
/// - Between 4 and 30 characters
/// - Only ASCII alphanumeric characters, underscores, and hyphens
/// - Not one of `reserved`
pub fn validate_username(username: &str, reserved: &[String]) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    for c in username.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(UserValidationError::InvalidUsernameCharacter(c));
        }
    }

    // All characters are ASCII at this point, so byte length == char count
    if username.len() < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if reserved.iter().any(|r| r == username) {
        return Err(UserValidationError::ReservedUsername(username.to_string()));
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !email.validate_email() {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a language code (e.g. `pt-br`)
pub fn validate_language(language: &str) -> Result<(), UserValidationError> {
    if language.chars().count() > MAX_LANGUAGE_LENGTH {
        return Err(UserValidationError::LanguageTooLong(MAX_LANGUAGE_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserved() -> Vec<String> {
        DEFAULT_RESERVED_USERNAMES
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_valid_usernames() {
        let reserved = reserved();
        assert!(validate_username("alice", &reserved).is_ok());
        assert!(validate_username("user_name", &reserved).is_ok());
        assert!(validate_username("user-name", &reserved).is_ok());
        assert!(validate_username("User123", &reserved).is_ok());
        assert!(validate_username(&"a".repeat(30), &reserved).is_ok());
    }

    #[test]
    fn test_empty_username() {
        assert_eq!(
            validate_username("", &reserved()),
            Err(UserValidationError::EmptyUsername)
        );
    }

    #[test]
    fn test_username_too_short() {
        assert_eq!(
            validate_username("bob", &reserved()),
            Err(UserValidationError::UsernameTooShort(4))
        );
    }

    #[test]
    fn test_username_too_long() {
        assert_eq!(
            validate_username(&"a".repeat(31), &reserved()),
            Err(UserValidationError::UsernameTooLong(30))
        );
    }

    #[test]
    fn test_username_invalid_character() {
        assert_eq!(
            validate_username("user@name", &reserved()),
            Err(UserValidationError::InvalidUsernameCharacter('@'))
        );
        assert_eq!(
            validate_username("josé_silva", &reserved()),
            Err(UserValidationError::InvalidUsernameCharacter('é'))
        );
    }

    #[test]
    fn test_reserved_usernames() {
        let reserved = reserved();

        for name in ["login", "logout", "admin", "account"] {
            assert_eq!(
                validate_username(name, &reserved),
                Err(UserValidationError::ReservedUsername(name.to_string()))
            );
        }

        // Reserved matching is exact
        assert!(validate_username("Admin", &reserved).is_ok());
        assert!(validate_username("admin2", &reserved).is_ok());
    }

    #[test]
    fn test_custom_reserved_set() {
        let reserved = vec!["root".to_string()];
        assert!(validate_username("admin", &reserved).is_ok());
        assert!(validate_username("root", &reserved).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert_eq!(validate_email(""), Err(UserValidationError::EmptyEmail));
        assert_eq!(
            validate_email("not-an-email"),
            Err(UserValidationError::InvalidEmail("not-an-email".to_string()))
        );
    }

    #[test]
    fn test_language() {
        assert!(validate_language("pt-br").is_ok());
        assert!(validate_language("en").is_ok());
        assert_eq!(
            validate_language("portuguese"),
            Err(UserValidationError::LanguageTooLong(6))
        );
    }

    #[test]
    fn test_into_domain_error() {
        let err: DomainError = UserValidationError::EmptyUsername.into();
        assert!(err.is_validation());
    }
}
