//! Wire and file formats: the gateway's form encoding and the CLI's CSV files.

pub mod csv;
pub mod form;
