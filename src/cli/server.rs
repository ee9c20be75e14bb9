//! Service commands - run one of the HTTP services

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::api::{
    create_auth_app, create_orders_app, create_products_app, AuthState, MetricsEndpoint,
    OrdersState, ProductsState,
};
use crate::config::{AppConfig, ServiceKind};
use crate::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};
use crate::infrastructure::storage::{connect_pool, run_service_migrations};

/// Run a service until SIGINT or SIGTERM
pub async fn run(kind: ServiceKind) -> anyhow::Result<()> {
    let config = load_config()?;
    init_observability(&config, kind);

    let app = build_app(&config, kind).await?;

    let addr = build_socket_addr(&config, kind)?;
    info!(service = %kind, "Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    info!(service = %kind, "Server shutdown complete");

    Ok(())
}

pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    AppConfig::load().context("failed to load configuration")
}

pub(crate) fn init_observability(config: &AppConfig, kind: ServiceKind) {
    init_tracing(
        &config.logging,
        &config.observability.tracing,
        config.observability.tracing.service_name_or(kind.name()),
    );
}

/// Open the pool and bring the schema up to date, or `None` for in-memory stores
pub(crate) async fn open_database(
    config: &AppConfig,
    kind: ServiceKind,
) -> anyhow::Result<Option<PgPool>> {
    let Some(postgres) = config.database.postgres_config() else {
        warn!(
            service = %kind,
            "No database URL configured, using in-memory storage; data is lost on restart"
        );
        return Ok(None);
    };

    let pool = connect_pool(&postgres).await?;
    info!(service = %kind, "Connected to PostgreSQL");

    if config.database.run_migrations {
        let applied = run_service_migrations(&pool, kind).await?;
        info!(service = %kind, applied, "Schema migrations complete");
    }

    Ok(Some(pool))
}

async fn build_app(config: &AppConfig, kind: ServiceKind) -> anyhow::Result<Router> {
    // Refuse to start the auth service without a signing secret
    if kind == ServiceKind::Auth {
        config.auth.jwt_config()?;
    }

    let pool = open_database(config, kind).await?;
    let metrics = init_metrics(&config.observability.metrics, kind.name()).map(|metrics| {
        MetricsEndpoint {
            metrics,
            path: config.observability.metrics.path.clone(),
        }
    });

    let app = match kind {
        ServiceKind::Auth => {
            let jwt_config = config.auth.jwt_config()?;
            let state = match pool {
                Some(pool) => AuthState::postgres(pool, jwt_config),
                None => AuthState::in_memory(jwt_config),
            };
            create_auth_app(state, metrics)
        }
        ServiceKind::Orders => {
            let state = pool.map_or_else(OrdersState::in_memory, OrdersState::postgres);
            create_orders_app(state, metrics)
        }
        ServiceKind::Products => {
            let state = pool.map_or_else(ProductsState::in_memory, ProductsState::postgres);
            create_products_app(state, metrics)
        }
    };

    Ok(app)
}

fn build_socket_addr(config: &AppConfig, kind: ServiceKind) -> anyhow::Result<SocketAddr> {
    let (host, port) = config.services.listen_on(kind);
    let ip = host
        .parse::<IpAddr>()
        .with_context(|| format!("invalid listen host '{}'", host))?;

    Ok(SocketAddr::from((ip, port)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_uses_service_default_port() {
        let config = AppConfig::default();

        let addr = build_socket_addr(&config, ServiceKind::Products).unwrap();

        assert_eq!(addr.port(), 3003);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn test_socket_addr_rejects_hostnames() {
        let mut config = AppConfig::default();
        config.services.orders.host = "not an ip".to_string();

        assert!(build_socket_addr(&config, ServiceKind::Orders).is_err());
    }

    #[tokio::test]
    async fn test_auth_requires_secret() {
        let config = AppConfig::default();

        let result = build_app(&config, ServiceKind::Auth).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_in_memory_fallback_without_database() {
        let config = AppConfig::default();

        assert!(open_database(&config, ServiceKind::Orders).await.unwrap().is_none());
    }
}
