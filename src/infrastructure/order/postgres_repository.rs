//! PostgreSQL order repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::order::{NewOrder, Order, OrderId, OrderRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of OrderRepository
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (user_id, product, quantity, total_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, product, quantity, total_price, created_at
            "#,
        )
        .bind(order.user_id().value())
        .bind(order.product())
        .bind(order.quantity())
        .bind(order.total_price())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create order: {}", e)))?;

        row_to_order(&row)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, product, quantity, total_price, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list orders: {}", e)))?;

        rows.iter().map(row_to_order).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count orders: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_order(row: &sqlx::postgres::PgRow) -> Result<Order, DomainError> {
    let id: i64 = row.get("id");
    let user_id: i64 = row.get("user_id");
    let product: String = row.get("product");
    let quantity: i32 = row.get("quantity");
    let total_price: f64 = row.get("total_price");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    let user_id = UserId::new(user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(Order::from_parts(
        OrderId::new(id),
        user_id,
        product,
        quantity,
        total_price,
        created_at,
    ))
}
