//! Product entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_description, validate_price, validate_product_name, validate_stock,
    ProductValidationError,
};

/// Store-assigned product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(id: i64) -> Result<Self, ProductValidationError> {
        if id <= 0 {
            return Err(ProductValidationError::InvalidId(id.to_string()));
        }

        Ok(Self(id))
    }

    /// Parse a product id from a path segment
    pub fn parse(value: &str) -> Result<Self, ProductValidationError> {
        let id = value
            .trim()
            .parse::<i64>()
            .map_err(|_| ProductValidationError::InvalidId(value.to_string()))?;

        Self::new(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated product that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    description: Option<String>,
    price: f64,
    stock: i32,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        price: f64,
        stock: i32,
    ) -> Result<Self, ProductValidationError> {
        let name = name.into().trim().to_string();

        validate_product_name(&name)?;
        if let Some(ref description) = description {
            validate_description(description)?;
        }
        validate_price(price)?;
        validate_stock(stock)?;

        Ok(Self {
            name,
            description,
            price,
            stock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    /// Attach the identifier assigned by the store
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none() && self.stock.is_none()
    }
}

/// Persisted product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: f64,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Rebuild a product from stored columns
    pub fn from_parts(
        id: ProductId,
        name: impl Into<String>,
        description: Option<String>,
        price: f64,
        stock: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description,
            price,
            stock,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a partial update after validating every provided field.
    /// Nothing is modified when any field is invalid.
    pub fn apply(&mut self, changes: ProductChanges) -> Result<(), ProductValidationError> {
        let name = changes.name.map(|n| n.trim().to_string());

        if let Some(ref name) = name {
            validate_product_name(name)?;
        }
        if let Some(ref description) = changes.description {
            validate_description(description)?;
        }
        if let Some(price) = changes.price {
            validate_price(price)?;
        }
        if let Some(stock) = changes.stock {
            validate_stock(stock)?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = changes.stock {
            self.stock = stock;
        }

        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
