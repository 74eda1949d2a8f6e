use thiserror::Error;

/// Failures that stop a checkout call from completing.
///
/// A gateway decline is deliberately absent: it is an expected outcome and is
/// returned as [`crate::domain::response::InitiationResult::Declined`].
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid invoice: {0}")]
    InvalidInvoice(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Integrity check failed: {0}")]
    Integrity(String),
    #[error("Gateway rejected request: {0}")]
    GatewayRejected(String),
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckoutError {
    /// Only transport failures may be retried, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
