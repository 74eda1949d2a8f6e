#![allow(dead_code)]

use checkout_gateway::domain::config::{IntegrationConfig, IntegrationKey};
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub const INTEGRATION_ID: &str = "1201";
pub const INTEGRATION_KEY: &str = "3e9fed89-60e1-4ce5-ab6e-6b1eb2d4f977";

pub fn config() -> IntegrationConfig {
    IntegrationConfig {
        integration_id: INTEGRATION_ID.to_string(),
        integration_key: IntegrationKey::new(INTEGRATION_KEY),
        return_url: "https://shop.example/return".to_string(),
        result_url: "https://shop.example/result".to_string(),
        currency: "USD".to_string(),
    }
}

/// Writes an invoices CSV with one row per `(invoice_number, amount)`.
pub fn invoices_csv(rows: &[(&str, &str)]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "id,invoice_number,total_amount,client_email,client_phone")?;
    for (i, (number, amount)) in rows.iter().enumerate() {
        writeln!(file, "{},{},{},client{}@example.com,", i + 1, number, amount, i + 1)?;
    }
    file.flush()?;
    Ok(file)
}
