//! Product validation utilities

use thiserror::Error;

/// Errors that can occur during product validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductValidationError {
    #[error("Invalid product ID: '{0}'")]
    InvalidId(String),

    #[error("Product name cannot be empty")]
    EmptyName,

    #[error("Product name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Description exceeds maximum length of {0} characters")]
    DescriptionTooLong(usize),

    #[error("Price must be a non-negative number")]
    InvalidPrice,

    #[error("Stock cannot be negative")]
    NegativeStock,
}

const MAX_NAME_LENGTH: usize = 255;
const MAX_DESCRIPTION_LENGTH: usize = 4000;

pub fn validate_product_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ProductValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ProductValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ProductValidationError::DescriptionTooLong(
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), ProductValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ProductValidationError::InvalidPrice);
    }

    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<(), ProductValidationError> {
    if stock < 0 {
        return Err(ProductValidationError::NegativeStock);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Desk").is_ok());
        assert_eq!(validate_product_name(""), Err(ProductValidationError::EmptyName));
        assert_eq!(
            validate_product_name(&"n".repeat(MAX_NAME_LENGTH + 1)),
            Err(ProductValidationError::NameTooLong(MAX_NAME_LENGTH))
        );
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert_eq!(validate_price(-0.01), Err(ProductValidationError::InvalidPrice));
        assert_eq!(validate_price(f64::NAN), Err(ProductValidationError::InvalidPrice));
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert_eq!(validate_stock(-1), Err(ProductValidationError::NegativeStock));
    }
}
