use crate::error::CheckoutError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::fmt;

/// A non-negative monetary amount as the gateway expects it: two decimal digits.
///
/// Values with more precision are rounded half away from zero, so `49.555`
/// becomes `49.56` and `49.5` is rendered as `49.50`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, CheckoutError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CheckoutError::InvalidInvoice(
                "Amount must not be negative".to_string(),
            ));
        }
        let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        // rescale gives up silently when the integer part leaves no room for cents
        if rounded.scale() != 2 {
            return Err(CheckoutError::InvalidInvoice(
                "Amount is out of range".to_string(),
            ));
        }
        Ok(Self(rounded))
    }

    /// Builds an amount from a float, rejecting NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self, CheckoutError> {
        if !value.is_finite() {
            return Err(CheckoutError::InvalidInvoice(
                "Amount must be a finite number".to_string(),
            ));
        }
        let decimal = Decimal::from_f64(value).ok_or_else(|| {
            CheckoutError::InvalidInvoice("Amount is out of range".to_string())
        })?;
        Self::new(decimal)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An invoice as the billing subsystem hands it over. Read-only here.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Invoice {
    pub id: String,
    /// Unique invoice number, sent as the gateway `reference`.
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
}

impl Invoice {
    /// Checks the invoice can be submitted and returns its formatted amount.
    pub fn validate(&self) -> Result<Amount, CheckoutError> {
        if self.invoice_number.trim().is_empty() {
            return Err(CheckoutError::InvalidInvoice(format!(
                "Invoice {} has no invoice number",
                self.id
            )));
        }
        if self.invoice_number.trim() != self.invoice_number {
            return Err(CheckoutError::InvalidInvoice(format!(
                "Invoice {} has whitespace around its invoice number",
                self.id
            )));
        }
        Amount::new(self.total_amount)
    }

    /// The phone number to authenticate with, if one is on file.
    pub fn phone(&self) -> Option<&str> {
        self.client_phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
    }
}
