//! PostgreSQL product repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::product::{NewProduct, Product, ProductId, ProductRepository};
use crate::domain::DomainError;

const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, created_at, updated_at";

/// PostgreSQL implementation of ProductRepository
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let query = format!(
            "INSERT INTO products (name, description, price, stock) VALUES ($1, $2, $3, $4) RETURNING {}",
            PRODUCT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(product.name())
            .bind(product.description())
            .bind(product.price())
            .bind(product.stock())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create product: {}", e)))?;

        row_to_product(&row)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get product: {}", e)))?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        let query = format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list products: {}", e)))?;

        rows.iter().map(row_to_product).collect()
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let query = format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5, updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(product.id().value())
            .bind(product.name())
            .bind(product.description())
            .bind(product.price())
            .bind(product.stock())
            .bind(product.updated_at())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update product: {}", e)))?;

        match row {
            Some(row) => row_to_product(&row),
            None => Err(DomainError::not_found(format!(
                "Product '{}' not found",
                product.id()
            ))),
        }
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete product: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count products: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_product(row: &sqlx::postgres::PgRow) -> Result<Product, DomainError> {
    let id: i64 = row.get("id");
    let name: String = row.get("name");
    let description: Option<String> = row.get("description");
    let price: f64 = row.get("price");
    let stock: i32 = row.get("stock");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let id = ProductId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid product ID in database: {}", e)))?;

    Ok(Product::from_parts(
        id,
        name,
        description,
        price,
        stock,
        created_at,
        updated_at,
    ))
}
