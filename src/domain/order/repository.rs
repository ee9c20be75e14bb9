//! Order repository trait

use async_trait::async_trait;

use super::entity::{NewOrder, Order};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for order persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order, assigning its identifier
    async fn create(&self, order: NewOrder) -> Result<Order, DomainError>;

    /// Lists the orders placed by a user, oldest first
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError>;

    /// Counts all stored orders
    async fn count(&self) -> Result<usize, DomainError>;
}
