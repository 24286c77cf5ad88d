use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use std::time::Duration;

use super::{CheckoutOrder, CheckoutSession, PaymentGateway, PaymentStatus};
use crate::{config::AppConfig, error::AppError, error::AppResult};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
    frontend_site_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    payment_status: Option<String>,
}

impl StripeGateway {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("stripe http client: {e}")))?;
        Ok(Self {
            http,
            secret_key: config.stripe_secret_key.clone(),
            frontend_site_url: config.frontend_site_url.clone(),
        })
    }

    fn unit_amount_cents(total: Decimal) -> i64 {
        // Stripe takes the amount in the currency's minor unit.
        (total * Decimal::ONE_HUNDRED).round().to_i64().unwrap_or(0)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(&self, order: &CheckoutOrder) -> AppResult<CheckoutSession> {
        let success_url = format!(
            "{}payment-success/{}?session_id={{CHECKOUT_SESSION_ID}}",
            self.frontend_site_url, order.oid
        );
        let cancel_url = format!("{}payment-failed/", self.frontend_site_url);
        let unit_amount = Self::unit_amount_cents(order.total).to_string();

        let params = [
            ("customer_email", order.email.as_str()),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price_data][currency]", "usd"),
            (
                "line_items[0][price_data][product_data][name]",
                order.full_name.as_str(),
            ),
            ("line_items[0][price_data][unit_amount]", unit_amount.as_str()),
            ("line_items[0][quantity]", "1"),
            ("mode", "payment"),
            ("success_url", success_url.as_str()),
            ("cancel_url", cancel_url.as_str()),
        ];

        let response = self
            .http
            .post(format!("{STRIPE_API_BASE}/checkout/sessions"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("stripe: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::PaymentProvider(format!(
                "stripe returned {}",
                response.status()
            )));
        }

        let session: StripeSession = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("stripe: {e}")))?;
        let url = session
            .url
            .ok_or_else(|| AppError::PaymentProvider("stripe session has no url".into()))?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn payment_status(&self, provider_ref: &str) -> AppResult<PaymentStatus> {
        let response = self
            .http
            .get(format!("{STRIPE_API_BASE}/checkout/sessions/{provider_ref}"))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("stripe: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::PaymentProvider(format!(
                "stripe returned {}",
                response.status()
            )));
        }

        let session: StripeSession = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("stripe: {e}")))?;

        let status = match session.payment_status.as_deref() {
            Some("paid") | Some("no_payment_required") => PaymentStatus::Paid,
            Some("unpaid") => PaymentStatus::Pending,
            _ => PaymentStatus::Failed,
        };
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn unit_amount_converts_to_cents() {
        let total = Decimal::from_str("110.00").unwrap();
        assert_eq!(StripeGateway::unit_amount_cents(total), 11000);
    }

    #[test]
    fn unit_amount_rounds_fractional_cents() {
        let total = Decimal::from_str("19.995").unwrap();
        assert_eq!(StripeGateway::unit_amount_cents(total), 2000);
    }

    #[test]
    fn constructor_is_fallible_not_panicking() {
        let config = AppConfig {
            database_url: "postgres://localhost/unused".into(),
            host: "127.0.0.1".into(),
            port: 3000,
            stripe_secret_key: "sk_test_123".into(),
            paypal_client_id: String::new(),
            paypal_secret_id: String::new(),
            frontend_site_url: "http://localhost:5173/".into(),
        };
        assert!(StripeGateway::new(&config).is_ok());
    }
}
