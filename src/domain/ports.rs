use crate::error::Result;
use async_trait::async_trait;

/// Performs the network exchange with the payment gateway.
///
/// One call is one attempt: implementations never retry. Failures of any kind
/// (connection, timeout, non-2xx status) are reported as
/// [`CheckoutError::Transport`](crate::error::CheckoutError::Transport).
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// POSTs a form-encoded `payload` to `endpoint` and returns the raw response body.
    async fn send(&self, endpoint: &str, payload: &str) -> Result<String>;
}

pub type TransportBox = Box<dyn GatewayTransport>;
