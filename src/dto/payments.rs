use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutSessionResponse {
    pub checkout_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentSuccessRequest {
    pub order_oid: String,
    /// Stripe checkout session id, when the client paid through Stripe.
    pub session_id: Option<String>,
    /// PayPal order id, when the client paid through PayPal.
    pub paypal_order_id: Option<String>,
}
