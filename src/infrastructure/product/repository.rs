//! In-memory product repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::product::{NewProduct, Product, ProductId, ProductRepository};
use crate::domain::DomainError;

/// In-memory implementation of ProductRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let raw_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = ProductId::new(raw_id).map_err(|e| DomainError::internal(e.to_string()))?;
        let product = product.into_product(id, Utc::now());

        self.products.write().await.insert(raw_id, product.clone());

        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.products.read().await.get(&id.value()).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let mut products = self.products.write().await;

        match products.get_mut(&product.id().value()) {
            Some(slot) => {
                *slot = product.clone();
                Ok(product)
            }
            None => Err(DomainError::not_found(format!(
                "Product '{}' not found",
                product.id()
            ))),
        }
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        Ok(self.products.write().await.remove(&id.value()).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.products.read().await.len())
    }
}
