use checkout_gateway::application::initiator::PaymentInitiator;
use checkout_gateway::domain::config::{IntegrationConfig, IntegrationKey};
use checkout_gateway::domain::ports::TransportBox;
use checkout_gateway::infrastructure::http::HttpTransport;
use checkout_gateway::interfaces::csv::invoice_reader::InvoiceReader;
use checkout_gateway::interfaces::csv::result_writer::{InitiationRecord, ResultWriter};
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GatewayArgs {
    /// Merchant integration id issued by the gateway
    #[arg(long, env = "CHECKOUT_INTEGRATION_ID", global = true)]
    integration_id: Option<String>,

    /// Shared integration key used to sign requests
    #[arg(long, env = "CHECKOUT_INTEGRATION_KEY", hide_env_values = true, global = true)]
    integration_key: Option<String>,

    /// URL the customer returns to after paying
    #[arg(long, env = "CHECKOUT_RETURN_URL", global = true)]
    return_url: Option<String>,

    /// URL the gateway posts status updates to
    #[arg(long, env = "CHECKOUT_RESULT_URL", global = true)]
    result_url: Option<String>,

    /// Three-letter currency code
    #[arg(long, env = "CHECKOUT_CURRENCY", default_value = "USD", global = true)]
    currency: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,
}

impl GatewayArgs {
    fn config(&self) -> IntegrationConfig {
        IntegrationConfig {
            integration_id: self.integration_id.clone().unwrap_or_default(),
            integration_key: IntegrationKey::new(self.integration_key.clone().unwrap_or_default()),
            return_url: self.return_url.clone().unwrap_or_default(),
            result_url: self.result_url.clone().unwrap_or_default(),
            currency: self.currency.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Initiate payment for every invoice in a CSV file
    Initiate {
        /// Invoices CSV: id,invoice_number,total_amount,client_email,client_phone
        input: PathBuf,

        /// Gateway initiate-transaction URL
        #[arg(long, env = "CHECKOUT_ENDPOINT")]
        endpoint: String,
    },
    /// Poll the status of one payment
    Poll {
        /// Poll URL returned when the payment was initiated
        poll_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only CSV results.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = cli.gateway.config();
    config.validate().into_diagnostic()?;

    let transport: TransportBox = Box::new(
        HttpTransport::with_timeout(Duration::from_secs(cli.gateway.timeout_secs))
            .into_diagnostic()?,
    );

    let stdout = io::stdout();
    let mut writer = ResultWriter::new(stdout.lock());

    match cli.command {
        Command::Initiate { input, endpoint } => {
            let initiator = PaymentInitiator::new(config, endpoint, transport);
            let file = File::open(input).into_diagnostic()?;
            for invoice in InvoiceReader::new(file).invoices() {
                match invoice {
                    Ok(invoice) => {
                        let result = initiator.initiate(&invoice).await;
                        let reference = invoice.invoice_number.as_str();
                        if let Err(e) = &result {
                            tracing::error!(reference, error = %e, "Error initiating payment");
                        }
                        let record = InitiationRecord::from_result(reference, &result);
                        writer.write_initiation(&record).into_diagnostic()?;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Error reading invoice");
                    }
                }
            }
        }
        Command::Poll { poll_url } => {
            // Polling is not tied to one initiate endpoint.
            let initiator = PaymentInitiator::new(config, String::new(), transport);
            let update = initiator.poll(&poll_url).await.into_diagnostic()?;
            writer.write_status(&update).into_diagnostic()?;
        }
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}
