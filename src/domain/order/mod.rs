//! Order domain

mod entity;
mod repository;
mod validation;

pub use entity::{NewOrder, Order, OrderId};
pub use repository::OrderRepository;
pub use validation::{
    validate_product_name, validate_quantity, validate_total_price, OrderValidationError,
};

#[cfg(test)]
pub use repository::MockOrderRepository;
