//! Product catalog domain

mod entity;
mod repository;
mod validation;

pub use entity::{NewProduct, Product, ProductChanges, ProductId};
pub use repository::ProductRepository;
pub use validation::{
    validate_description, validate_price, validate_product_name, validate_stock,
    ProductValidationError,
};

#[cfg(test)]
pub use repository::MockProductRepository;
