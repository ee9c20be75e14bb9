//! Order validation utilities

use thiserror::Error;

/// Errors that can occur during order validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrderValidationError {
    #[error("Product cannot be empty")]
    EmptyProduct,

    #[error("Product exceeds maximum length of {0} characters")]
    ProductTooLong(usize),

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Total price must be a non-negative number")]
    InvalidTotalPrice,
}

const MAX_PRODUCT_LENGTH: usize = 255;

pub fn validate_product_name(product: &str) -> Result<(), OrderValidationError> {
    if product.trim().is_empty() {
        return Err(OrderValidationError::EmptyProduct);
    }

    if product.chars().count() > MAX_PRODUCT_LENGTH {
        return Err(OrderValidationError::ProductTooLong(MAX_PRODUCT_LENGTH));
    }

    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), OrderValidationError> {
    if quantity < 1 {
        return Err(OrderValidationError::InvalidQuantity);
    }

    Ok(())
}

pub fn validate_total_price(total_price: f64) -> Result<(), OrderValidationError> {
    if !total_price.is_finite() || total_price < 0.0 {
        return Err(OrderValidationError::InvalidTotalPrice);
    }

    Ok(())
}
