//! Product catalog service

use std::sync::Arc;

use crate::domain::product::{NewProduct, Product, ProductChanges, ProductId, ProductRepository};
use crate::domain::DomainError;

/// Request for creating a product
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

pub const NO_CHANGES_MESSAGE: &str =
    "At least one of name, description, price or stock is required";

/// Product service for catalog management
#[derive(Debug)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a product
    pub async fn create(&self, request: CreateProductRequest) -> Result<Product, DomainError> {
        let product = NewProduct::new(
            request.name,
            request.description,
            request.price,
            request.stock,
        )
        .map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.create(product).await
    }

    /// List every product ordered by ID
    pub async fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.repository.list().await
    }

    /// Apply a partial update to an existing product
    pub async fn update(&self, id: &str, changes: ProductChanges) -> Result<Product, DomainError> {
        let id = parse_id(id)?;

        if changes.is_empty() {
            return Err(DomainError::validation(NO_CHANGES_MESSAGE));
        }

        let mut product = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Product '{}' not found", id)))?;

        product
            .apply(changes)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.update(product).await
    }

    /// Delete a product; `NotFound` when it does not exist
    pub async fn delete(&self, id: &str) -> Result<ProductId, DomainError> {
        let id = parse_id(id)?;

        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found(format!("Product '{}' not found", id)));
        }

        Ok(id)
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

fn parse_id(id: &str) -> Result<ProductId, DomainError> {
    ProductId::parse(id).map_err(|e| DomainError::validation(e.to_string()))
}
