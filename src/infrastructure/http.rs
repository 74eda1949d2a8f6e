use crate::domain::ports::GatewayTransport;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A [`GatewayTransport`] over HTTPS using `reqwest`.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// A transport with no timeout of its own.
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    /// A transport that abandons any exchange taking longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, endpoint: &str, error: reqwest::Error) -> CheckoutError {
        if error.is_timeout() {
            let after = self
                .timeout
                .map(|t| format!(" after {}ms", t.as_millis()))
                .unwrap_or_default();
            CheckoutError::Transport(format!("request to {endpoint} timed out{after}"))
        } else if error.is_connect() {
            CheckoutError::Transport(format!("could not connect to {endpoint}"))
        } else {
            let cause = error.without_url();
            CheckoutError::Transport(format!("request to {endpoint} failed: {cause}"))
        }
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    async fn send(&self, endpoint: &str, payload: &str) -> Result<String> {
        tracing::debug!(endpoint, bytes = payload.len(), "sending gateway request");

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(payload.to_owned())
            .send()
            .await
            .map_err(|e| self.map_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckoutError::Transport(format!(
                "gateway at {endpoint} answered with HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_error(endpoint, e))?;
        tracing::debug!(
            endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            "gateway responded"
        );
        Ok(body)
    }
}
