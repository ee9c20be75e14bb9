//! Shop services
//!
//! Three independent HTTP services built from one crate:
//! - auth: registration, login and JWT-protected access
//! - orders: order placement and per-user listing
//! - products: catalog CRUD
//!
//! Each service stores its data in PostgreSQL, or in memory when no
//! database URL is configured.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, ServiceKind};
