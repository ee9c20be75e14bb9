//! Product infrastructure: stores and service

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresProductRepository;
pub use repository::InMemoryProductRepository;
pub use service::{CreateProductRequest, ProductService};
