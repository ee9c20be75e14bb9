//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Invalid user ID: '{0}'")]
    InvalidId(String),

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Normalize a submitted email: surrounding whitespace is not significant
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Validate the presence of registration fields
///
/// An absent field and an empty one are the same condition.
pub fn require_credentials<'a>(
    email: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str), UserValidationError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(UserValidationError::MissingCredentials),
    }
}

/// Validate an email address
///
/// Rules:
/// - Maximum 254 characters
/// - Exactly one '@'
/// - Non-empty local and domain parts
/// - No whitespace
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(UserValidationError::InvalidEmail);
    }

    let mut parts = email.split('@');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(UserValidationError::InvalidEmail),
    }
}

/// Validate a password
///
/// Only an upper bound is enforced; the hash input is capped.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
