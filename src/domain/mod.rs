//! Protocol value types and the transport port.

pub mod config;
pub mod invoice;
pub mod parameters;
pub mod ports;
pub mod response;
