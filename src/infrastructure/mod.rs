//! Infrastructure layer - Stores, services and external integrations

pub mod auth;
pub mod observability;
pub mod order;
pub mod product;
pub mod storage;
pub mod user;
