use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::orders::{ApplyCouponRequest, CreateOrderRequest, OrderCreated, OrderWithItems},
    error::AppResult,
    response::ApiResponse,
    services::{
        coupon_service::{self, CouponApplication},
        order_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/{oid}", get(get_order))
        .route("/{oid}/apply-coupon", post(apply_coupon))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created from cart", body = ApiResponse<OrderCreated>),
        (status = 400, description = "Cart is empty"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderCreated>>)> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{oid}",
    params(
        ("oid" = String, Path, description = "Public order code")
    ),
    responses(
        (status = 200, description = "Order with items and applied coupons", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(oid): Path<String>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &oid).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{oid}/apply-coupon",
    params(
        ("oid" = String, Path, description = "Public order code")
    ),
    request_body = ApplyCouponRequest,
    responses(
        (status = 201, description = "Coupon activated", body = ApiResponse<serde_json::Value>),
        (status = 200, description = "Coupon already applied or no matching items", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Order or coupon not found"),
    ),
    tag = "Orders"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Path(oid): Path<String>,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    let outcome = coupon_service::apply_coupon(&state, &oid, &payload.coupon_code).await?;
    let (status, body) = match outcome {
        CouponApplication::Applied => (
            StatusCode::CREATED,
            ApiResponse::with_icon(
                "Coupon Found and Activated",
                "success",
                serde_json::json!({}),
            ),
        ),
        CouponApplication::AlreadyApplied => (
            StatusCode::OK,
            ApiResponse::with_icon("Coupon Already Applied", "warning", serde_json::json!({})),
        ),
        CouponApplication::NoMatchingItems => (
            StatusCode::OK,
            ApiResponse::with_icon(
                "Order Item Does Not Exist",
                "warning",
                serde_json::json!({}),
            ),
        ),
    };
    Ok((status, Json(body)))
}
