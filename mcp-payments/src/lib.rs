#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! The Payment Gate: pricing, rail registry, and the lifecycle that
//! turns a priced tool call into a verified, settled payment.
//!
//! # Modules
//!
//! - [`error`] — [`error::GateError`], the gate's own error surface
//! - [`facilitator_client`] — generic reqwest-backed [`Facilitator`](mcp_proto::Facilitator) over an HTTP facilitator
//! - [`gate`] — [`gate::PaymentGate`], the verify -> settle orchestration
//! - [`pricing`] — [`pricing::Pricing`], how much a tool call costs

pub mod error;
pub mod facilitator_client;
pub mod gate;
pub mod pricing;

pub use error::GateError;
pub use facilitator_client::FacilitatorHttpClient;
pub use gate::{PaymentGate, Rail, VerifiedPayment};
pub use pricing::Pricing;
