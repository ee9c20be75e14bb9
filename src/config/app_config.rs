use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::auth::{
    JwtConfig, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, MIN_TOKEN_TTL_SECS,
};
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::storage::PostgresConfig;

/// Plain environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Plain environment variable holding the database URL
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// The three services shipped by this binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ServiceKind {
    Auth,
    Orders,
    Products,
}

impl ServiceKind {
    /// Service name used in logs, traces and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth => "auth-service",
            Self::Orders => "order-service",
            Self::Products => "product-service",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Auth => 3001,
            Self::Orders => 3002,
            Self::Products => 3003,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub services: ServicesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Relational store settings; no URL means in-memory stores
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    /// Apply the service's schema migrations at startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

/// Listen address of every service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub auth: ServerConfig,
    #[serde(default)]
    pub orders: ServerConfig,
    #[serde(default)]
    pub products: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Falls back to the service's default port
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            run_migrations: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: default_token_ttl(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

impl DatabaseConfig {
    /// Pool settings, or `None` when no URL is configured
    pub fn postgres_config(&self) -> Option<PostgresConfig> {
        let url = self.url.as_deref().filter(|u| !u.trim().is_empty())?;

        Some(
            PostgresConfig::new(url)
                .with_max_connections(self.max_connections)
                .with_min_connections(self.min_connections)
                .with_connect_timeout(self.connect_timeout_secs)
                .with_idle_timeout(self.idle_timeout_secs),
        )
    }
}

impl AuthConfig {
    /// Token settings; the signing secret is mandatory and the lifetime
    /// must lie between one second and one day
    pub fn jwt_config(&self) -> Result<JwtConfig, DomainError> {
        if !(MIN_TOKEN_TTL_SECS..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(DomainError::configuration(format!(
                "auth.token_ttl_secs must be between {} and {}, got {}",
                MIN_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS, self.token_ttl_secs
            )));
        }

        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => {
                Ok(JwtConfig::new(secret, self.token_ttl_secs))
            }
            _ => Err(DomainError::configuration(format!(
                "{} must be set to a non-empty value",
                JWT_SECRET_ENV
            ))),
        }
    }
}

impl ServicesConfig {
    /// Host and port a service listens on
    pub fn listen_on(&self, kind: ServiceKind) -> (&str, u16) {
        let server = match kind {
            ServiceKind::Auth => &self.auth,
            ServiceKind::Orders => &self.orders,
            ServiceKind::Products => &self.products,
        };

        (&server.host, server.port.unwrap_or_else(|| kind.default_port()))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(app_config)
    }

    /// Fill the secret and database URL from their plain variable names
    /// when the layered sources left them unset
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.auth.jwt_secret.is_none() {
            self.auth.jwt_secret = lookup(JWT_SECRET_ENV);
        }

        if self.database.url.is_none() {
            self.database.url = lookup(DATABASE_URL_ENV);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.database.url.is_none());
        assert!(config.database.run_migrations);
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.services.listen_on(ServiceKind::Auth), ("0.0.0.0", 3001));
        assert_eq!(config.services.listen_on(ServiceKind::Orders), ("0.0.0.0", 3002));
        assert_eq!(config.services.listen_on(ServiceKind::Products), ("0.0.0.0", 3003));
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let source = config::Config::builder()
            .set_override("services.orders.port", 9002)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap();

        let config: AppConfig = source.try_deserialize().unwrap();

        assert_eq!(config.services.listen_on(ServiceKind::Orders), ("0.0.0.0", 9002));
        assert_eq!(config.services.listen_on(ServiceKind::Auth).1, 3001);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_env_overrides_fill_missing_values() {
        let env: HashMap<&str, &str> = [("JWT_SECRET", "s3cret"), ("DATABASE_URL", "postgres://db/auth")]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();

        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.auth.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/auth"));
    }

    #[test]
    fn test_env_overrides_keep_layered_values() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("from-file".to_string());

        config.apply_env_overrides(|_| Some("from-env".to_string()));

        assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_jwt_config_requires_secret() {
        let mut auth = AuthConfig::default();
        assert!(matches!(
            auth.jwt_config(),
            Err(DomainError::Configuration { .. })
        ));

        auth.jwt_secret = Some("   ".to_string());
        assert!(auth.jwt_config().is_err());

        auth.jwt_secret = Some("secret".to_string());
        let jwt = auth.jwt_config().unwrap();
        assert_eq!(jwt.token_ttl_secs, 3600);
    }

    #[test]
    fn test_jwt_config_rejects_out_of_range_lifetime() {
        let mut auth = AuthConfig {
            jwt_secret: Some("secret".to_string()),
            ..AuthConfig::default()
        };

        for ttl_secs in [0, MAX_TOKEN_TTL_SECS + 1, u64::MAX] {
            auth.token_ttl_secs = ttl_secs;
            assert!(matches!(
                auth.jwt_config(),
                Err(DomainError::Configuration { .. })
            ));
        }

        for ttl_secs in [MIN_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS] {
            auth.token_ttl_secs = ttl_secs;
            assert_eq!(auth.jwt_config().unwrap().token_ttl_secs, ttl_secs);
        }
    }

    #[test]
    fn test_auth_config_debug_hides_secret() {
        let auth = AuthConfig {
            jwt_secret: Some("very-secret".to_string()),
            token_ttl_secs: 60,
        };

        assert!(!format!("{:?}", auth).contains("very-secret"));
    }

    #[test]
    fn test_postgres_config_only_with_url() {
        let mut database = DatabaseConfig::default();
        assert!(database.postgres_config().is_none());

        database.url = Some("postgres://localhost/orders".to_string());
        database.max_connections = 4;
        let pg = database.postgres_config().unwrap();

        assert_eq!(pg.url, "postgres://localhost/orders");
        assert_eq!(pg.max_connections, 4);
    }
}
