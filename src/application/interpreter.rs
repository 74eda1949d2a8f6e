use crate::domain::config::IntegrationKey;
use crate::domain::parameters::IntegrityHash;
use crate::domain::response::{GatewayResponse, InitiationResult, PaymentStatus, StatusUpdate};
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// The only `status` value that counts as an accepted initiation.
pub const STATUS_OK: &str = "Ok";
/// Decline reason when the gateway gives neither a redirect nor an error.
pub const UNKNOWN_RESPONSE: &str = "unknown gateway response";

/// Classifies decoded gateway messages. Stateless.
pub struct ResultInterpreter;

impl ResultInterpreter {
    /// Maps an initiation response to its outcome.
    ///
    /// `status=Ok` only counts with a usable `browserurl`; a success without
    /// one is a decline. An explicit `error` wins over `message`.
    pub fn interpret(response: &GatewayResponse) -> InitiationResult {
        if response.status() == Some(STATUS_OK)
            && let Some(url) = response.non_empty("browserurl")
        {
            return InitiationResult::Redirect {
                url: url.trim().to_string(),
                poll_url: response.non_empty("pollurl").map(|u| u.trim().to_string()),
            };
        }

        let reason = response
            .non_empty("error")
            .or_else(|| response.non_empty("message"))
            .unwrap_or(UNKNOWN_RESPONSE);
        InitiationResult::Declined {
            reason: reason.to_string(),
        }
    }

    /// Maps a poll response or result callback to a verified status update.
    pub fn interpret_status(
        response: &GatewayResponse,
        key: &IntegrationKey,
    ) -> Result<StatusUpdate> {
        if let Some(error) = response.non_empty("error") {
            return Err(CheckoutError::GatewayRejected(error.to_string()));
        }
        if response.get("hash").is_none() {
            return Err(CheckoutError::Integrity("status message is not signed".to_string()));
        }
        if !IntegrityHash::verify(response.iter(), key) {
            return Err(CheckoutError::Integrity("status message hash mismatch".to_string()));
        }

        let reference = response
            .non_empty("reference")
            .ok_or_else(|| CheckoutError::MalformedResponse("missing reference".to_string()))?;
        let status = response
            .non_empty("status")
            .ok_or_else(|| CheckoutError::MalformedResponse("missing status".to_string()))?;
        let amount = response
            .non_empty("amount")
            .map(|raw| {
                Decimal::from_str(raw.trim()).map_err(|_| {
                    CheckoutError::MalformedResponse(format!("unparsable amount {raw:?}"))
                })
            })
            .transpose()?;

        Ok(StatusUpdate {
            reference: reference.to_string(),
            amount,
            gateway_reference: response.non_empty("paynowreference").map(str::to_string),
            poll_url: response.non_empty("pollurl").map(str::to_string),
            status: PaymentStatus::parse(status),
        })
    }
}
