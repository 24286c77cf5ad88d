use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{CheckoutOrder, CheckoutSession, PaymentGateway, PaymentStatus};
use crate::{config::AppConfig, error::AppError, error::AppResult};

const PAYPAL_API_BASE: &str = "https://api-m.sandbox.paypal.com";

pub struct PaypalGateway {
    http: reqwest::Client,
    client_id: String,
    secret_id: String,
    frontend_site_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PaypalLink {
    rel: String,
    href: String,
}

#[derive(Debug, Deserialize)]
struct PaypalOrder {
    id: String,
    status: String,
    #[serde(default)]
    links: Vec<PaypalLink>,
}

impl PaypalGateway {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("paypal http client: {e}")))?;
        Ok(Self {
            http,
            client_id: config.paypal_client_id.clone(),
            secret_id: config.paypal_secret_id.clone(),
            frontend_site_url: config.frontend_site_url.clone(),
        })
    }

    /// Client-credentials token; PayPal requires one per API call batch.
    async fn access_token(&self) -> AppResult<String> {
        let response = self
            .http
            .post(format!("{PAYPAL_API_BASE}/v1/oauth2/token"))
            .basic_auth(&self.client_id, Some(&self.secret_id))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("paypal: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::PaymentProvider(format!(
                "failed to get access token from paypal ({})",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("paypal: {e}")))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PaypalGateway {
    async fn create_checkout_session(&self, order: &CheckoutOrder) -> AppResult<CheckoutSession> {
        let token = self.access_token().await?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "reference_id": order.oid,
                "amount": {
                    "currency_code": "USD",
                    "value": order.total.to_string(),
                }
            }],
            "application_context": {
                "return_url": format!("{}payment-success/{}", self.frontend_site_url, order.oid),
                "cancel_url": format!("{}payment-failed/", self.frontend_site_url),
            }
        });

        let response = self
            .http
            .post(format!("{PAYPAL_API_BASE}/v2/checkout/orders"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("paypal: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::PaymentProvider(format!(
                "paypal returned {}",
                response.status()
            )));
        }

        let order: PaypalOrder = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("paypal: {e}")))?;
        let approve = order
            .links
            .iter()
            .find(|link| link.rel == "approve")
            .ok_or_else(|| AppError::PaymentProvider("paypal order has no approve link".into()))?;

        Ok(CheckoutSession {
            id: order.id.clone(),
            url: approve.href.clone(),
        })
    }

    async fn payment_status(&self, provider_ref: &str) -> AppResult<PaymentStatus> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(format!("{PAYPAL_API_BASE}/v2/checkout/orders/{provider_ref}"))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("paypal: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::PaymentProvider(format!(
                "paypal returned {}",
                response.status()
            )));
        }

        let order: PaypalOrder = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("paypal: {e}")))?;

        let status = match order.status.as_str() {
            "COMPLETED" => PaymentStatus::Paid,
            "CREATED" | "SAVED" | "APPROVED" | "PAYER_ACTION_REQUIRED" => PaymentStatus::Pending,
            _ => PaymentStatus::Failed,
        };
        Ok(status)
    }
}
