//! Errors surfaced by the payment gate.

use mcp_proto::facilitator::FacilitatorError;

/// Failure modes of running a tool call through the payment gate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GateError {
    /// No configured rail matches any requirement the client offered.
    #[error("no configured payment rail can satisfy this request")]
    NoMatchingRail,
    /// The client sent a malformed `X-PAYMENT` header.
    #[error("malformed payment header: {0}")]
    MalformedHeader(String),
    /// Verification against the chosen rail's facilitator failed.
    #[error("payment verification failed: {0}")]
    VerificationFailed(#[source] FacilitatorError),
    /// Verification succeeded but settlement failed.
    #[error("payment settlement failed: {0}")]
    SettlementFailed(#[source] FacilitatorError),
}
