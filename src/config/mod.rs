//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig,
    ServiceKind, ServicesConfig, DATABASE_URL_ENV, JWT_SECRET_ENV,
};
