use rust_decimal::Decimal;

/// A decoded gateway message: flat string keys to string values.
///
/// Keys keep the spelling and order they arrived in, so signatures can be
/// checked over exactly what the gateway signed. Lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayResponse {
    fields: Vec<(String, String)>,
}

impl GatewayResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing the value of an existing key that differs only in case.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some(field) => field.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Like [`get`](Self::get) but treats blank values as missing.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    pub fn status(&self) -> Option<&str> {
        self.get("status")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields as received.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + Clone {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GatewayResponse {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut response = Self::new();
        for (k, v) in iter {
            response.insert(k, v);
        }
        response
    }
}

/// Outcome of one payment initiation attempt.
///
/// Transport failures are not a variant: they surface as
/// [`CheckoutError::Transport`](crate::error::CheckoutError::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitiationResult {
    /// Send the customer to `url` to complete payment.
    Redirect {
        url: String,
        poll_url: Option<String>,
    },
    /// The gateway refused the request; `reason` is safe to show the customer.
    Declined { reason: String },
}

impl InitiationResult {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// Payment state as reported by polling or by the result callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Created,
    Sent,
    Paid,
    AwaitingDelivery,
    Delivered,
    Cancelled,
    Disputed,
    Refunded,
    Failed,
    /// A value the gateway sent that is not enumerated above.
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "created" => Self::Created,
            "sent" => Self::Sent,
            "paid" => Self::Paid,
            "awaitingdelivery" => Self::AwaitingDelivery,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            "disputed" => Self::Disputed,
            "refunded" => Self::Refunded,
            "failed" => Self::Failed,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Money has been received by the merchant.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid | Self::AwaitingDelivery | Self::Delivered)
    }

    /// No further transitions are expected.
    pub fn is_final(&self) -> bool {
        self.is_paid() || matches!(self, Self::Cancelled | Self::Refunded | Self::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "Created",
            Self::Sent => "Sent",
            Self::Paid => "Paid",
            Self::AwaitingDelivery => "Awaiting Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Disputed => "Disputed",
            Self::Refunded => "Refunded",
            Self::Failed => "Failed",
            Self::Other(raw) => raw,
        }
    }
}

/// A verified status message about one invoice payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Our invoice number.
    pub reference: String,
    pub amount: Option<Decimal>,
    /// The gateway's own transaction reference.
    pub gateway_reference: Option<String>,
    pub poll_url: Option<String>,
    pub status: PaymentStatus,
}
