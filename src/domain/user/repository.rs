//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for the credential store
///
/// Implementations must enforce email uniqueness atomically and report a
/// duplicate insert as `DomainError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their email (for login and uniqueness checks)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Insert a new user, assigning its identifier
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Count stored users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
