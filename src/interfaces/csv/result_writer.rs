use crate::domain::response::{InitiationResult, StatusUpdate};
use crate::error::{CheckoutError, Result};
use serde::Serialize;
use std::io::Write;

/// One output row of a batch initiation run.
#[derive(Debug, Serialize, PartialEq)]
pub struct InitiationRecord {
    pub invoice_number: String,
    pub outcome: &'static str,
    pub detail: String,
}

impl InitiationRecord {
    pub fn from_result(invoice_number: &str, result: &Result<InitiationResult>) -> Self {
        let (outcome, detail) = match result {
            Ok(InitiationResult::Redirect { url, .. }) => ("redirect", url.clone()),
            Ok(InitiationResult::Declined { reason }) => ("declined", reason.clone()),
            Err(e) => ("error", e.to_string()),
        };
        Self {
            invoice_number: invoice_number.to_string(),
            outcome,
            detail,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusRecord<'a> {
    reference: &'a str,
    status: &'a str,
    paid: bool,
}

/// Writes CSV results for the CLI.
pub struct ResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_initiation(&mut self, record: &InitiationRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn write_status(&mut self, update: &StatusUpdate) -> Result<()> {
        self.writer.serialize(StatusRecord {
            reference: &update.reference,
            status: update.status.as_str(),
            paid: update.status.is_paid(),
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(CheckoutError::from)
    }
}
