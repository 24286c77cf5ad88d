use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub stripe_secret_key: String,
    pub paypal_client_id: String,
    pub paypal_secret_id: String,
    /// Base URL the payment providers redirect back to after checkout.
    pub frontend_site_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let stripe_secret_key = env::var("STRIPE_SECRET_KEY").unwrap_or_default();
        let paypal_client_id = env::var("PAYPAL_CLIENT_ID").unwrap_or_default();
        let paypal_secret_id = env::var("PAYPAL_SECRET_ID").unwrap_or_default();
        let frontend_site_url =
            env::var("FRONTEND_SITE_URL").unwrap_or_else(|_| "http://localhost:5173/".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            stripe_secret_key,
            paypal_client_id,
            paypal_secret_id,
            frontend_site_url,
        })
    }
}
