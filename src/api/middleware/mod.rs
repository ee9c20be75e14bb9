//! API middleware components

pub mod logging;
pub mod metrics;
pub mod security;
pub mod user_auth;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::security_headers_middleware;
pub use user_auth::{extract_bearer_token, RequireUser, INVALID_TOKEN_MESSAGE};
