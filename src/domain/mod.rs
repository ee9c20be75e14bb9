//! Domain layer - Core entities, validation rules and repository traits

pub mod error;
pub mod order;
pub mod product;
pub mod user;

pub use error::DomainError;
pub use order::{NewOrder, Order, OrderId, OrderRepository, OrderValidationError};
pub use product::{
    NewProduct, Product, ProductChanges, ProductId, ProductRepository, ProductValidationError,
};
pub use user::{NewUser, User, UserId, UserRepository, UserValidationError};
