//! Protocol-level error types.

use std::fmt;

/// JSON-RPC 2.0 standard error codes, plus the MCP-specific range.
///
/// The negative ranges below -32000 are reserved for server-defined
/// errors; we use them for payment and cancellation failures so clients
/// can distinguish "your request was malformed" from "payment required
/// but rejected" without parsing the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorCode {
    /// Invalid JSON was received.
    ParseError,
    /// The JSON sent is not a valid request object.
    InvalidRequest,
    /// The method does not exist or is not available.
    MethodNotFound,
    /// Invalid method parameter(s).
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
    /// Payment was required but not supplied or rejected.
    PaymentRejected,
    /// The request was cancelled before completion.
    Cancelled,
}

impl RpcErrorCode {
    /// The numeric JSON-RPC error code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::PaymentRejected => -32001,
            Self::Cancelled => -32002,
        }
    }
}

/// A decode/encode or protocol-shape failure in the wire layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProtoError {
    /// The JSON payload could not be parsed into the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),
    /// A required field was missing.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A field held a value outside its accepted range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// The offending field's name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// A human/machine-readable description of a payment failure, shared by
/// both the [`crate::facilitator::FacilitatorError`] type and the
/// payment gate's own error surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProblem {
    /// Machine-readable reason code.
    pub reason: ErrorReason,
    /// Human-readable detail.
    pub detail: String,
}

impl PaymentProblem {
    /// Builds a new problem description.
    #[must_use]
    pub fn new(reason: ErrorReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for PaymentProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.reason, self.detail)
    }
}

/// Machine-readable payment failure reasons, shared across both rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorReason {
    /// The payment payload did not match the advertised requirements.
    InvalidPayload,
    /// The payer's signature/authorization did not verify.
    InvalidSignature,
    /// The payer does not hold sufficient funds.
    InsufficientFunds,
    /// The requirement's validity window had expired.
    Expired,
    /// The facilitator rejected settlement for an on-ledger reason.
    SettlementFailed,
    /// An error not covered by a specific reason.
    UnexpectedError,
}

/// Types that can be converted into a [`PaymentProblem`] for uniform
/// reporting back to the client over the 402 body or the terminal frame.
pub trait AsPaymentProblem {
    /// Produces the problem description for this error.
    fn as_payment_problem(&self) -> PaymentProblem;
}
