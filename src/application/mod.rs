//! Application layer: the checkout protocol itself.
//!
//! A payment attempt flows strictly one way, `GatewayRequestBuilder` ->
//! `GatewayTransport` -> `ResultInterpreter`, orchestrated by
//! `PaymentInitiator`. Nothing here is persisted; the caller decides what to
//! store from the returned result.

pub mod builder;
pub mod initiator;
pub mod interpreter;
