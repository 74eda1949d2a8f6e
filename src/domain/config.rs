use crate::error::CheckoutError;
use std::fmt;

/// The shared secret used to sign requests and verify gateway messages.
///
/// Never printed: `Debug` and `Display` both render `***`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IntegrationKey(String);

impl IntegrationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for IntegrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IntegrationKey(***)")
    }
}

impl fmt::Display for IntegrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Merchant integration settings, passed explicitly to the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationConfig {
    pub integration_id: String,
    pub integration_key: IntegrationKey,
    /// Where the customer lands after paying.
    pub return_url: String,
    /// Where the gateway posts asynchronous status updates.
    pub result_url: String,
    pub currency: String,
}

impl IntegrationConfig {
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("integration id", self.integration_id.as_str()),
            ("return url", self.return_url.as_str()),
            ("result url", self.result_url.as_str()),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CheckoutError::Configuration(format!("missing {name}")));
            }
        }
        if self.integration_key.is_empty() {
            return Err(CheckoutError::Configuration(
                "missing integration key".to_string(),
            ));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CheckoutError::Configuration(
                "currency must be a three-letter code".to_string(),
            ));
        }
        Ok(())
    }
}
