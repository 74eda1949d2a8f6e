use crate::domain::config::IntegrationConfig;
use crate::domain::invoice::Invoice;
use crate::domain::parameters::{HASH_KEY, IntegrityHash, ParameterSet};
use crate::error::Result;
use crate::interfaces::form;

/// Sent as `authphone` when the client has no phone number on file.
pub const PHONE_PLACEHOLDER: &str = "N/A";
/// Fixed `status` value for an initiation request.
pub const INITIATE_STATUS: &str = "Message";

/// A signed initiation request, ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRequest {
    /// The invoice number; the gateway deduplicates on it.
    pub reference: String,
    /// Signed parameters, without the hash.
    pub parameters: ParameterSet,
    pub hash: IntegrityHash,
    /// Form-encoded body: parameters in key order, then `hash`.
    pub payload: String,
}

/// Turns an invoice into a signed gateway request.
///
/// Building is a pure function of the invoice and the configuration: no
/// timestamps or nonces go into the request, so resubmitting the same invoice
/// produces the same payload.
pub struct GatewayRequestBuilder<'a> {
    config: &'a IntegrationConfig,
}

impl<'a> GatewayRequestBuilder<'a> {
    pub fn new(config: &'a IntegrationConfig) -> Self {
        Self { config }
    }

    /// Validates configuration and invoice, then assembles and signs the request.
    ///
    /// # Errors
    ///
    /// * `Configuration` if any integration setting is missing.
    /// * `InvalidInvoice` if the amount is negative or out of range, or the
    ///   invoice number is empty or padded with whitespace.
    pub fn build(&self, invoice: &Invoice) -> Result<BuiltRequest> {
        self.config.validate()?;
        let amount = invoice.validate()?;
        let reference = invoice.invoice_number.clone();

        let mut parameters = ParameterSet::new();
        parameters.insert("id", self.config.integration_id.as_str());
        parameters.insert("reference", reference.as_str());
        parameters.insert("amount", amount.to_string());
        parameters.insert("additionalinfo", format!("Invoice {reference}"));
        parameters.insert("returnurl", self.config.return_url.as_str());
        parameters.insert("resulturl", self.config.result_url.as_str());
        parameters.insert("status", INITIATE_STATUS);
        parameters.insert("authemail", invoice.client_email.trim());
        parameters.insert("authphone", invoice.phone().unwrap_or(PHONE_PLACEHOLDER));
        parameters.insert("currency", self.config.currency.as_str());

        let hash = IntegrityHash::compute(parameters.iter(), &self.config.integration_key);
        let payload = form::encode(
            parameters
                .iter()
                .chain(std::iter::once((HASH_KEY, hash.as_str()))),
        );

        tracing::debug!(reference = %reference, amount = %amount, "built gateway request");
        Ok(BuiltRequest {
            reference,
            parameters,
            hash,
            payload,
        })
    }
}
