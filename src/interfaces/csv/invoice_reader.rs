use crate::domain::invoice::Invoice;
use crate::error::{CheckoutError, Result};
use std::io::Read;

/// Reads invoices from a CSV source with the header
/// `id,invoice_number,total_amount,client_email,client_phone`.
///
/// Whitespace around fields is trimmed and the trailing `client_phone`
/// column may be left out.
pub struct InvoiceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvoiceReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes invoices; a bad row yields an error and reading continues.
    pub fn invoices(self) -> impl Iterator<Item = Result<Invoice>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
