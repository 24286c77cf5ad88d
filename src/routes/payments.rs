use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::{
    dto::payments::{CheckoutSessionResponse, PaymentSuccessRequest},
    error::AppResult,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stripe-checkout/{oid}", post(stripe_checkout))
        .route("/success", post(payment_success))
}

#[utoipa::path(
    post,
    path = "/api/payments/stripe-checkout/{oid}",
    params(
        ("oid" = String, Path, description = "Public order code")
    ),
    responses(
        (status = 200, description = "Checkout session or provider failure body", body = ApiResponse<CheckoutSessionResponse>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Payments"
)]
pub async fn stripe_checkout(
    State(state): State<AppState>,
    Path(oid): Path<String>,
) -> AppResult<Json<ApiResponse<CheckoutSessionResponse>>> {
    let resp = payment_service::stripe_checkout(&state, &oid).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/success",
    request_body = PaymentSuccessRequest,
    responses(
        (status = 200, description = "Payment outcome body", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "No provider reference supplied"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Payments"
)]
pub async fn payment_success(
    State(state): State<AppState>,
    Json(payload): Json<PaymentSuccessRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = payment_service::confirm_payment(&state, payload).await?;
    Ok(Json(resp))
}
