//! Order entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_product_name, validate_quantity, validate_total_price, OrderValidationError,
};
use crate::domain::user::UserId;

/// Store-assigned order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated order that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    user_id: UserId,
    product: String,
    quantity: i32,
    total_price: f64,
}

impl NewOrder {
    /// Build a new order, validating every field
    pub fn new(
        user_id: UserId,
        product: impl Into<String>,
        quantity: i32,
        total_price: f64,
    ) -> Result<Self, OrderValidationError> {
        let product = product.into().trim().to_string();

        validate_product_name(&product)?;
        validate_quantity(quantity)?;
        validate_total_price(total_price)?;

        Ok(Self {
            user_id,
            product,
            quantity,
            total_price,
        })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Attach the identifier assigned by the store
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            user_id: self.user_id,
            product: self.product,
            quantity: self.quantity,
            total_price: self.total_price,
            created_at,
        }
    }
}

/// Persisted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    product: String,
    quantity: i32,
    total_price: f64,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Rebuild an order from stored columns
    pub fn from_parts(
        id: OrderId,
        user_id: UserId,
        product: impl Into<String>,
        quantity: i32,
        total_price: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            product: product.into(),
            quantity,
            total_price,
            created_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
