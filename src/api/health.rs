//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;

use crate::api::types::Json;
use crate::domain::DomainError;

use super::state::{AuthState, OrdersState, ProductsState};

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// A service state whose backing store can be probed
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Name reported in the readiness checks
    fn component(&self) -> &'static str;

    /// Round-trip to the store
    async fn probe(&self) -> Result<(), DomainError>;
}

#[async_trait]
impl ReadinessProbe for AuthState {
    fn component(&self) -> &'static str {
        "user_store"
    }

    async fn probe(&self) -> Result<(), DomainError> {
        self.user_service.count().await.map(|_| ())
    }
}

#[async_trait]
impl ReadinessProbe for OrdersState {
    fn component(&self) -> &'static str {
        "order_store"
    }

    async fn probe(&self) -> Result<(), DomainError> {
        self.order_service.count().await.map(|_| ())
    }
}

#[async_trait]
impl ReadinessProbe for ProductsState {
    fn component(&self) -> &'static str {
        "product_store"
    }

    async fn probe(&self) -> Result<(), DomainError> {
        self.product_service.count().await.map(|_| ())
    }
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check against the service's store.
/// 503 when the store cannot be reached.
pub async fn ready_check<S>(State(state): State<S>) -> impl IntoResponse
where
    S: ReadinessProbe + Clone + 'static,
{
    let start = Instant::now();
    let check = check_component(&state).await;
    let overall_status = check.status;

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - used for Kubernetes liveness probes to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_component<S: ReadinessProbe>(state: &S) -> HealthCheck {
    let start = Instant::now();
    let name = state.component().to_string();

    match state.probe().await {
        Ok(()) => HealthCheck {
            name,
            status: HealthStatus::Healthy,
            message: None,
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Err(e) => {
            // Store errors can carry connection details
            error!(component = %name, error = %e, "Readiness probe failed");
            HealthCheck {
                name,
                status: HealthStatus::Unhealthy,
                message: Some("store unavailable".to_string()),
                latency_ms: Some(start.elapsed().as_millis() as u64),
            }
        }
    }
}
