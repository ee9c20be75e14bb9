//! Product catalog API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::api::state::ProductsState;
use crate::api::types::{ApiError, ApiErrorResponse, Json};
use crate::domain::{Product, ProductChanges};
use crate::infrastructure::product::CreateProductRequest;

const MISSING_FIELDS_MESSAGE: &str = "name, price and stock are required";
const DELETED_MESSAGE: &str = "Product deleted successfully";

/// Create the products router
pub fn create_products_router() -> Router<ProductsState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
}

/// Product creation body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    #[schema(example = "Keyboard")]
    pub name: Option<String>,
    #[schema(example = "Mechanical, tenkeyless")]
    pub description: Option<String>,
    #[schema(example = 29.99)]
    pub price: Option<f64>,
    #[schema(example = 10)]
    pub stock: Option<i32>,
}

impl CreateProductBody {
    fn into_request(self) -> Result<CreateProductRequest, ApiError> {
        match (self.name, self.price, self.stock) {
            (Some(name), Some(price), Some(stock)) => Ok(CreateProductRequest {
                name,
                description: self.description,
                price,
                stock,
            }),
            _ => Err(ApiError::bad_request(MISSING_FIELDS_MESSAGE)),
        }
    }
}

/// Partial product update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl From<UpdateProductBody> for ProductChanges {
    fn from(body: UpdateProductBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            price: body.price,
            stock: body.stock,
        }
    }
}

/// Product as exposed on the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id().value(),
            name: product.name().to_string(),
            description: product.description().map(str::to_string),
            price: product.price(),
            stock: product.stock(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteProductResponse {
    pub message: String,
    pub id: i64,
}

/// Add a product to the catalog
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductBody,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product", body = ApiErrorResponse),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<ProductsState>,
    Json(body): Json<CreateProductBody>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state.product_service.create(body.into_request()?).await?;

    info!(product_id = %product.id(), "Product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// List the catalog
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products, by id", body = [ProductResponse]),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<ProductsState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.product_service.list().await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Update some fields of a product
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    request_body = UpdateProductBody,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid identifier or values", body = ApiErrorResponse),
        (status = 404, description = "Product not found", body = ApiErrorResponse),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.product_service.update(&id, body.into()).await?;

    info!(product_id = %product.id(), "Product updated");

    Ok(Json(product.into()))
}

/// Remove a product from the catalog
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteProductResponse),
        (status = 400, description = "Invalid identifier", body = ApiErrorResponse),
        (status = 404, description = "Product not found", body = ApiErrorResponse),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<ProductsState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteProductResponse>, ApiError> {
    let id = state.product_service.delete(&id).await?;

    info!(product_id = %id, "Product deleted");

    Ok(Json(DeleteProductResponse {
        message: DELETED_MESSAGE.to_string(),
        id: id.value(),
    }))
}
