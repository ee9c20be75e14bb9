//! API layer - HTTP endpoints and middleware

pub mod auth;
pub mod health;
pub mod middleware;
pub mod openapi;
pub mod orders;
pub mod products;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_auth_app, create_orders_app, create_products_app, MetricsEndpoint};
pub use state::{AuthState, OrdersState, ProductsState};
