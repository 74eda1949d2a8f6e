use crate::application::builder::GatewayRequestBuilder;
use crate::application::interpreter::ResultInterpreter;
use crate::domain::config::IntegrationConfig;
use crate::domain::invoice::Invoice;
use crate::domain::parameters::IntegrityHash;
use crate::domain::ports::TransportBox;
use crate::domain::response::{InitiationResult, StatusUpdate};
use crate::error::{CheckoutError, Result};
use crate::interfaces::form;

/// Runs one payment attempt end to end: build, send, interpret.
///
/// Holds no mutable state, so one initiator can serve concurrent calls for
/// different invoices. Two concurrent calls for the same invoice number must be
/// serialized by the caller; the gateway deduplicates on the reference.
pub struct PaymentInitiator {
    config: IntegrationConfig,
    endpoint: String,
    transport: TransportBox,
}

impl PaymentInitiator {
    /// Creates an initiator posting to `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `config` - Merchant integration settings, including the secret key.
    /// * `endpoint` - The gateway's initiate-transaction URL.
    /// * `transport` - How requests reach the gateway.
    pub fn new(
        config: IntegrationConfig,
        endpoint: impl Into<String>,
        transport: TransportBox,
    ) -> Self {
        Self {
            config,
            endpoint: endpoint.into(),
            transport,
        }
    }

    /// Initiates payment of `invoice`.
    ///
    /// Returns `Ok` for both redirects and declines. Configuration and invoice
    /// problems fail before anything is sent; transport failures and signed
    /// responses whose hash does not verify fail after.
    pub async fn initiate(&self, invoice: &Invoice) -> Result<InitiationResult> {
        let request = GatewayRequestBuilder::new(&self.config).build(invoice)?;
        let reference = request.reference.as_str();

        let body = self.transport.send(&self.endpoint, &request.payload).await?;
        let response = form::decode(&body);

        if response.get("hash").is_some()
            && !IntegrityHash::verify(response.iter(), &self.config.integration_key)
        {
            tracing::warn!(reference, "initiation response failed hash verification");
            return Err(CheckoutError::Integrity(
                "initiation response hash mismatch".to_string(),
            ));
        }

        let result = ResultInterpreter::interpret(&response);
        match &result {
            InitiationResult::Redirect { .. } => {
                tracing::info!(reference, outcome = "redirect", "payment initiated");
            }
            InitiationResult::Declined { reason } => {
                tracing::warn!(
                    reference,
                    outcome = "declined",
                    reason = %reason,
                    status = ?response.status(),
                    "payment declined"
                );
            }
        }
        Ok(result)
    }

    /// Asks the gateway for the current state of a payment.
    pub async fn poll(&self, poll_url: &str) -> Result<StatusUpdate> {
        if poll_url.trim().is_empty() {
            return Err(CheckoutError::Configuration("missing poll url".to_string()));
        }
        let body = self.transport.send(poll_url, "").await?;
        let response = form::decode(&body);
        let update = ResultInterpreter::interpret_status(&response, &self.config.integration_key)
            .inspect_err(|e| tracing::warn!(error = %e, "status poll rejected"))?;
        tracing::info!(
            reference = %update.reference,
            status = update.status.as_str(),
            "payment status polled"
        );
        Ok(update)
    }

    /// Verifies and interprets a status notification posted to the result URL.
    pub fn verify_callback(&self, body: &str) -> Result<StatusUpdate> {
        let response = form::decode(body);
        let update = ResultInterpreter::interpret_status(&response, &self.config.integration_key)
            .inspect_err(|e| tracing::warn!(error = %e, "result callback rejected"))?;
        tracing::info!(
            reference = %update.reference,
            status = update.status.as_str(),
            "result callback verified"
        );
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::IntegrationKey;
    use crate::domain::response::{GatewayResponse, PaymentStatus};
    use crate::infrastructure::in_memory::InMemoryTransport;
    use rust_decimal_macros::dec;

    const ENDPOINT: &str = "https://gateway.example/interface/initiatetransaction";

    fn config() -> IntegrationConfig {
        IntegrationConfig {
            integration_id: "1201".to_string(),
            integration_key: IntegrationKey::new("3e9fed89-60e1-4ce5-ab6e-6b1eb2d4f977"),
            return_url: "https://shop.example/return".to_string(),
            result_url: "https://shop.example/result".to_string(),
            currency: "USD".to_string(),
        }
    }

    fn invoice(number: &str) -> Invoice {
        Invoice {
            id: "1".to_string(),
            invoice_number: number.to_string(),
            total_amount: dec!(49.5),
            client_email: "a@b.com".to_string(),
            client_phone: None,
        }
    }

    fn signed_body(fields: &[(&str, &str)]) -> String {
        let response: GatewayResponse = fields.iter().copied().collect();
        let hash = IntegrityHash::compute(response.iter(), &config().integration_key);
        form::encode(response.iter().chain(std::iter::once(("hash", hash.as_str()))))
    }

    #[tokio::test]
    async fn test_initiate_redirect() {
        let transport = InMemoryTransport::new();
        transport
            .push_reply(concat!(
                "status=Ok&browserurl=https%3a%2f%2fpay.example%2fx",
                "&pollurl=https%3a%2f%2fpay.example%2fpoll",
            ))
            .await;
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport.clone()));

        let result = initiator.initiate(&invoice("INV-100")).await.unwrap();
        assert_eq!(
            result,
            InitiationResult::Redirect {
                url: "https://pay.example/x".to_string(),
                poll_url: Some("https://pay.example/poll".to_string()),
            }
        );

        let requests = transport.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].endpoint, ENDPOINT);
        assert!(requests[0].payload.contains("reference=INV-100"));
        assert!(requests[0].payload.contains("amount=49.50"));
    }

    #[tokio::test]
    async fn test_initiate_declined() {
        let transport = InMemoryTransport::new();
        transport.push_reply("status=Error&error=Insufficient+funds").await;
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport));

        let result = initiator.initiate(&invoice("INV-100")).await.unwrap();
        assert_eq!(
            result,
            InitiationResult::Declined {
                reason: "Insufficient funds".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = InMemoryTransport::new();
        transport.push_failure("request timed out").await;
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport));

        let err = initiator.initiate(&invoice("INV-100")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Transport(_)));
    }

    #[tokio::test]
    async fn test_configuration_error_sends_nothing() {
        let transport = InMemoryTransport::new();
        transport.push_reply("status=Ok&browserurl=https://pay.example/x").await;
        let mut cfg = config();
        cfg.integration_key = IntegrationKey::default();
        let initiator = PaymentInitiator::new(cfg, ENDPOINT, Box::new(transport.clone()));

        let err = initiator.initiate(&invoice("INV-100")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Configuration(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_invoice_sends_nothing() {
        let transport = InMemoryTransport::new();
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport.clone()));

        let err = initiator.initiate(&invoice("")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidInvoice(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_resubmission_sends_identical_payload() {
        let transport = InMemoryTransport::new();
        transport.push_reply("status=Error&error=Try+again").await;
        transport.push_reply("status=Error&error=Try+again").await;
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport.clone()));

        initiator.initiate(&invoice("INV-7")).await.unwrap();
        initiator.initiate(&invoice("INV-7")).await.unwrap();

        let requests = transport.requests().await;
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test]
    async fn test_signed_initiation_response_is_verified() {
        let transport = InMemoryTransport::new();
        transport
            .push_reply(signed_body(&[
                ("status", "Ok"),
                ("browserurl", "https://pay.example/x"),
            ]))
            .await;
        transport
            .push_reply("status=Ok&browserurl=https%3a%2f%2fevil.example&hash=DEADBEEF")
            .await;
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport));

        assert!(initiator.initiate(&invoice("INV-1")).await.unwrap().is_redirect());
        assert!(matches!(
            initiator.initiate(&invoice("INV-2")).await,
            Err(CheckoutError::Integrity(_))
        ));
    }

    #[tokio::test]
    async fn test_poll_status() {
        let transport = InMemoryTransport::new();
        transport
            .push_reply(signed_body(&[
                ("reference", "INV-100"),
                ("amount", "49.50"),
                ("status", "Awaiting Delivery"),
            ]))
            .await;
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport.clone()));

        let update = initiator.poll("https://pay.example/poll?guid=9").await.unwrap();
        assert_eq!(update.status, PaymentStatus::AwaitingDelivery);
        assert_eq!(transport.requests().await[0].endpoint, "https://pay.example/poll?guid=9");
        assert_eq!(transport.requests().await[0].payload, "");
    }

    #[tokio::test]
    async fn test_mixed_case_signed_initiation_response() {
        let transport = InMemoryTransport::new();
        transport
            .push_reply(signed_body(&[
                ("Status", "Ok"),
                ("BrowserUrl", "https://pay.example/x"),
                ("pollurl", "https://pay.example/poll"),
            ]))
            .await;
        let initiator = PaymentInitiator::new(config(), ENDPOINT, Box::new(transport));

        assert_eq!(
            initiator.initiate(&invoice("INV-1")).await.unwrap(),
            InitiationResult::Redirect {
                url: "https://pay.example/x".to_string(),
                poll_url: Some("https://pay.example/poll".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_poll_requires_url() {
        let transport = Box::new(InMemoryTransport::new());
        let initiator = PaymentInitiator::new(config(), ENDPOINT, transport);
        assert!(matches!(
            initiator.poll(" ").await,
            Err(CheckoutError::Configuration(_))
        ));
    }

    #[test]
    fn test_verify_callback() {
        let transport = Box::new(InMemoryTransport::new());
        let initiator = PaymentInitiator::new(config(), ENDPOINT, transport);
        let body = signed_body(&[
            ("reference", "INV-100"),
            ("paynowreference", "12345"),
            ("status", "Cancelled"),
        ]);

        let update = initiator.verify_callback(&body).unwrap();
        assert_eq!(update.status, PaymentStatus::Cancelled);
        assert!(update.status.is_final());

        let forged = body.replace("Cancelled", "Paid");
        assert!(matches!(
            initiator.verify_callback(&forged),
            Err(CheckoutError::Integrity(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_initiations_for_different_invoices() {
        let transport = InMemoryTransport::new();
        for _ in 0..10 {
            transport.push_reply("status=Ok&browserurl=https://pay.example/x").await;
        }
        let initiator = std::sync::Arc::new(PaymentInitiator::new(
            config(),
            ENDPOINT,
            Box::new(transport.clone()),
        ));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let initiator = initiator.clone();
                tokio::spawn(async move {
                    let invoice = invoice(&format!("INV-{i}"));
                    initiator.initiate(&invoice).await
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_redirect());
        }
        assert_eq!(transport.requests().await.len(), 10);
    }
}
