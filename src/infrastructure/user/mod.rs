//! User infrastructure module
//!
//! Argon2 password hashing, in-memory and PostgreSQL credential stores, and
//! the user service driving registration and login.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{UserService, ALREADY_REGISTERED};
