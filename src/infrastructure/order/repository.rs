//! In-memory order repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::order::{NewOrder, Order, OrderId, OrderRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of OrderRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<BTreeMap<i64, Order>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let order = order.into_order(OrderId::new(id), Utc::now());

        self.orders.write().await.insert(id, order.clone());

        Ok(order)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        let orders = self.orders.read().await;

        Ok(orders
            .values()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.orders.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn new_order(user_id: i64, product: &str) -> NewOrder {
        NewOrder::new(user(user_id), product, 1, 10.0).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let repo = InMemoryOrderRepository::new();

        let first = repo.create(new_order(1, "Lamp")).await.unwrap();
        let second = repo.create(new_order(1, "Desk")).await.unwrap();

        assert_eq!(first.id().value(), 1);
        assert_eq!(second.id().value(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_by_user_filters_and_orders() {
        let repo = InMemoryOrderRepository::new();
        repo.create(new_order(1, "Lamp")).await.unwrap();
        repo.create(new_order(2, "Chair")).await.unwrap();
        repo.create(new_order(1, "Desk")).await.unwrap();

        let orders = repo.list_by_user(user(1)).await.unwrap();
        let products: Vec<&str> = orders.iter().map(|o| o.product()).collect();

        assert_eq!(products, vec!["Lamp", "Desk"]);
        assert!(repo.list_by_user(user(3)).await.unwrap().is_empty());
    }
}
