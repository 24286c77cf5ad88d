use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::AppResult;

pub mod paypal;
pub mod stripe;

pub use paypal::PaypalGateway;
pub use stripe::StripeGateway;

/// What a provider reports for a payment reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// Provider-side reference used later to query payment status.
    pub id: String,
    /// URL the buyer is redirected to.
    pub url: String,
}

/// The slice of an order a provider needs to open a checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    pub oid: String,
    pub full_name: String,
    pub email: String,
    pub total: Decimal,
}

/// Capability interface over the external payment providers. Implementations
/// hold their own credentials; nothing here reads global state.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, order: &CheckoutOrder) -> AppResult<CheckoutSession>;

    async fn payment_status(&self, provider_ref: &str) -> AppResult<PaymentStatus>;
}
