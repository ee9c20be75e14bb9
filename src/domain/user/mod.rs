//! User domain
//!
//! This module provides domain types and traits for the credential store:
//! user entities, validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, require_credentials, validate_email, validate_password, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
