//! Storage infrastructure - PostgreSQL pooling and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{run_service_migrations, service_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, is_unique_violation, ping, PostgresConfig};
