//! Command line interface
//!
//! One binary, one subcommand per service:
//! - `auth`: registration, login and token-protected access
//! - `orders`: order placement and listing
//! - `products`: catalog management
//! - `migrate`: apply (or revert) a service's schema migrations

pub mod migrate;
pub mod server;

use clap::{Parser, Subcommand};

use crate::config::ServiceKind;

/// Authentication, order and product HTTP services
#[derive(Parser)]
#[command(name = "shop-services")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the authentication service
    Auth,

    /// Run the order service
    Orders,

    /// Run the product service
    Products,

    /// Apply the schema migrations of a service
    Migrate(migrate::MigrateArgs),
}
