//! Order service

use std::sync::Arc;

use crate::domain::order::{NewOrder, Order, OrderRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request for placing an order
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub product: String,
    pub quantity: i32,
    pub total_price: f64,
}

/// Order service: validates input and delegates to the store
#[derive(Debug)]
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Place a new order
    pub async fn create(&self, request: CreateOrderRequest) -> Result<Order, DomainError> {
        let user_id =
            UserId::new(request.user_id).map_err(|e| DomainError::validation(e.to_string()))?;

        let order = NewOrder::new(user_id, request.product, request.quantity, request.total_price)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.create(order).await
    }

    /// List a user's orders, oldest first
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, DomainError> {
        let user_id = UserId::parse(user_id).map_err(|e| DomainError::validation(e.to_string()))?;
        self.repository.list_by_user(user_id).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
