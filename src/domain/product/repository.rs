//! Product repository trait

use async_trait::async_trait;

use super::entity::{NewProduct, Product, ProductId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository for product persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a new product, assigning its identifier
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError>;

    /// Finds a product by ID
    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Lists all products ordered by ID
    async fn list(&self) -> Result<Vec<Product>, DomainError>;

    /// Replaces a stored product; `NotFound` if it no longer exists
    async fn update(&self, product: Product) -> Result<Product, DomainError>;

    /// Deletes a product, returning whether it existed
    async fn delete(&self, id: ProductId) -> Result<bool, DomainError>;

    /// Counts stored products
    async fn count(&self) -> Result<usize, DomainError>;
}
