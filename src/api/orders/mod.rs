//! Order API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::api::state::OrdersState;
use crate::api::types::{ApiError, ApiErrorResponse, Json};
use crate::domain::Order;
use crate::infrastructure::order::CreateOrderRequest;

/// Create the orders router
pub fn create_orders_router() -> Router<OrdersState> {
    Router::new()
        .route("/", post(create_order))
        .route("/user/{user_id}", get(list_user_orders))
}

const MISSING_FIELDS_MESSAGE: &str = "userId, product, quantity and totalPrice are required";

/// Order placement body
///
/// Every field is required; absent ones are reported as a 400 rather than a
/// deserialization failure.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    #[schema(example = 1)]
    pub user_id: Option<i64>,
    #[schema(example = "Keyboard")]
    pub product: Option<String>,
    #[schema(example = 2)]
    pub quantity: Option<i32>,
    #[schema(example = 59.98)]
    pub total_price: Option<f64>,
}

impl CreateOrderBody {
    fn into_request(self) -> Result<CreateOrderRequest, ApiError> {
        match (self.user_id, self.product, self.quantity, self.total_price) {
            (Some(user_id), Some(product), Some(quantity), Some(total_price)) => {
                Ok(CreateOrderRequest {
                    user_id,
                    product,
                    quantity,
                    total_price,
                })
            }
            _ => Err(ApiError::bad_request(MISSING_FIELDS_MESSAGE)),
        }
    }
}

/// Order as exposed on the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub product: String,
    pub quantity: i32,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id().value(),
            user_id: order.user_id().value(),
            product: order.product().to_string(),
            quantity: order.quantity(),
            total_price: order.total_price(),
            created_at: order.created_at(),
        }
    }
}

/// Place an order
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderBody,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid order", body = ApiErrorResponse),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<OrdersState>,
    Json(body): Json<CreateOrderBody>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state.order_service.create(body.into_request()?).await?;

    info!(order_id = %order.id(), user_id = %order.user_id(), "Order created");

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// List a user's orders
#[utoipa::path(
    get,
    path = "/orders/user/{user_id}",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Orders of the user, oldest first", body = [OrderResponse]),
        (status = 400, description = "Invalid user identifier", body = ApiErrorResponse),
        (status = 500, description = "Store failure", body = ApiErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn list_user_orders(
    State(state): State<OrdersState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.order_service.list_by_user(&user_id).await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
