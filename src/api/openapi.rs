//! OpenAPI documents, one per service
//!
//! Each service serves its own document at `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::auth::{CredentialsRequest, LoginResponse, ProtectedResponse, RegisterResponse};
use crate::api::orders::{CreateOrderBody, OrderResponse};
use crate::api::products::{
    CreateProductBody, DeleteProductResponse, ProductResponse, UpdateProductBody,
};
use crate::api::types::{ApiErrorDetail, ApiErrorResponse, ApiErrorType, Json};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Bearer JWT scheme referenced by `security(("bearer_auth" = []))`
struct BearerAuthAddon;

impl Modify for BearerAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .description(Some("Token returned by POST /auth/login"))
                .build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth Service API",
        version = "1.0.0",
        description = "User registration, login and token-protected access."
    ),
    servers((url = "http://localhost:3001", description = "Development")),
    paths(
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::protected,
    ),
    components(schemas(
        CredentialsRequest,
        RegisterResponse,
        LoginResponse,
        ProtectedResponse,
        ApiErrorResponse,
        ApiErrorDetail,
        ApiErrorType,
    )),
    modifiers(&BearerAuthAddon),
    tags((name = "Auth", description = "Registration, login and protected access"))
)]
pub struct AuthApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order Service API",
        version = "1.0.0",
        description = "Order placement and per-user order history."
    ),
    servers((url = "http://localhost:3002", description = "Development")),
    paths(
        crate::api::orders::create_order,
        crate::api::orders::list_user_orders,
    ),
    components(schemas(
        CreateOrderBody,
        OrderResponse,
        ApiErrorResponse,
        ApiErrorDetail,
        ApiErrorType,
    )),
    tags((name = "Orders", description = "Order placement and listing"))
)]
pub struct OrdersApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Service API",
        version = "1.0.0",
        description = "Product catalog management."
    ),
    servers((url = "http://localhost:3003", description = "Development")),
    paths(
        crate::api::products::create_product,
        crate::api::products::list_products,
        crate::api::products::update_product,
        crate::api::products::delete_product,
    ),
    components(schemas(
        CreateProductBody,
        UpdateProductBody,
        ProductResponse,
        DeleteProductResponse,
        ApiErrorResponse,
        ApiErrorDetail,
        ApiErrorType,
    )),
    tags((name = "Products", description = "Catalog CRUD"))
)]
pub struct ProductsApiDoc;

/// Serve the document of `D` as JSON
pub async fn openapi_json<D: OpenApi>() -> Json<utoipa::openapi::OpenApi> {
    Json(D::openapi())
}
