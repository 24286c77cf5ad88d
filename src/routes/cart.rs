use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartList, CartStats},
    error::AppResult,
    models::CartItem,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_to_cart))
        .route("/{cart_id}", get(cart_list))
        .route("/{cart_id}/stats", get(cart_stats))
        .route("/{cart_id}/{item_id}", delete(remove_from_cart))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Cart item created", body = ApiResponse<CartItem>),
        (status = 200, description = "Cart item overwritten", body = ApiResponse<CartItem>),
        (status = 400, description = "Course not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartItem>>)> {
    let upsert = cart_service::add_to_cart(&state.pool, payload).await?;
    let status = if upsert.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let message = if upsert.created {
        "Cart Created Successfully"
    } else {
        "Cart Updated Successfully"
    };
    Ok((status, Json(ApiResponse::success(message, upsert.item, None))))
}

#[utoipa::path(
    get,
    path = "/api/cart/{cart_id}",
    params(
        ("cart_id" = String, Path, description = "Client-held cart token")
    ),
    responses(
        (status = 200, description = "Cart rows for the session", body = ApiResponse<CartList>),
    ),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::list_cart(&state.pool, &cart_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cart/{cart_id}/stats",
    params(
        ("cart_id" = String, Path, description = "Client-held cart token")
    ),
    responses(
        (status = 200, description = "Cart totals", body = ApiResponse<CartStats>),
    ),
    tag = "Cart"
)]
pub async fn cart_stats(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartStats>>> {
    let resp = cart_service::cart_statistics(&state.pool, &cart_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{cart_id}/{item_id}",
    params(
        ("cart_id" = String, Path, description = "Client-held cart token"),
        ("item_id" = Uuid, Path, description = "Cart item id")
    ),
    responses(
        (status = 200, description = "Removed", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_from_cart(&state.pool, &cart_id, item_id).await?;
    Ok(Json(resp))
}
