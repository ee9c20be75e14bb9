use axum::http::{HeaderValue, Request};
use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::health::{self, ReadinessProbe};
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::openapi::{openapi_json, AuthApiDoc, OrdersApiDoc, ProductsApiDoc, OPENAPI_PATH};
use super::state::{AuthState, OrdersState, ProductsState};
use super::{auth, orders, products};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Prometheus scrape endpoint mounted beside the service routes
pub struct MetricsEndpoint {
    pub metrics: PrometheusMetrics,
    pub path: String,
}

/// Auth service: `/auth/*` plus probes and docs
pub fn create_auth_app(state: AuthState, metrics: Option<MetricsEndpoint>) -> Router {
    let routes = Router::new()
        .nest("/auth", auth::create_auth_router())
        .route(OPENAPI_PATH, get(openapi_json::<AuthApiDoc>));

    finish(with_probes(routes).with_state(state), metrics)
}

/// Order service: `/orders/*` plus probes and docs
pub fn create_orders_app(state: OrdersState, metrics: Option<MetricsEndpoint>) -> Router {
    let routes = Router::new()
        .nest("/orders", orders::create_orders_router())
        .route(OPENAPI_PATH, get(openapi_json::<OrdersApiDoc>));

    finish(with_probes(routes).with_state(state), metrics)
}

/// Product service: `/products/*` plus probes and docs
pub fn create_products_app(state: ProductsState, metrics: Option<MetricsEndpoint>) -> Router {
    let routes = Router::new()
        .nest("/products", products::create_products_router())
        .route(OPENAPI_PATH, get(openapi_json::<ProductsApiDoc>));

    finish(with_probes(routes).with_state(state), metrics)
}

fn with_probes<S>(router: Router<S>) -> Router<S>
where
    S: ReadinessProbe + Clone + 'static,
{
    router
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check::<S>))
        .route("/live", get(health::live_check))
}

fn finish(router: Router, metrics: Option<MetricsEndpoint>) -> Router {
    let mut router = router
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
        .layer(CorsLayer::permissive());

    if let Some(endpoint) = metrics {
        router = router.merge(create_metrics_router(endpoint.metrics, &endpoint.path));
    }

    router
}

/// Assigns a v4 UUID to requests arriving without `x-request-id`
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    use crate::infrastructure::auth::JwtConfig;

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_auth_app_probes_and_docs() {
        let app = create_auth_app(
            AuthState::in_memory(JwtConfig::with_secret("router-test-secret")),
            None,
        );

        for uri in ["/health", "/ready", "/live", OPENAPI_PATH] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_request_id_assigned_and_propagated() {
        let app = create_orders_app(OrdersState::in_memory(), None);

        let response = app.clone().oneshot(get_request("/live")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/live")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_products_app_serves_catalog_with_security_headers() {
        let app = create_products_app(ProductsState::in_memory(), None);

        let response = app.oneshot(get_request("/products")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_orders_app(OrdersState::in_memory(), None);

        let response = app.oneshot(get_request("/auth/login")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
