//! The streaming envelope a tool handler emits and the dispatcher drains
//! into SSE events.

use serde::Serialize;
use serde_json::Value;

use crate::payment::PaymentInfo;

/// One unit of progress from a running tool call.
///
/// A handler that streams pushes zero or more [`Frame::Progress`] /
/// [`Frame::Log`] frames followed by exactly one terminal frame
/// ([`Frame::Structured`] or [`Frame::Error`]) — the dispatcher enforces
/// the single-terminal-frame invariant and closes the SSE stream the
/// moment it sees one.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Frame {
    /// Incremental progress, not the final result.
    Progress {
        /// Units of work completed so far.
        current: u64,
        /// Total units of work, when the handler knows it up front.
        total: u64,
        /// Human-readable progress message.
        message: String,
    },
    /// A free-form log line emitted mid-execution.
    Log {
        /// Log level as the handler reported it.
        level: String,
        /// The log message.
        message: String,
    },
    /// Terminal: the tool call completed successfully.
    Structured {
        /// The tool's result payload.
        result: Value,
        /// Populated when this call was payment-gated and settled.
        #[serde(skip_serializing_if = "Option::is_none")]
        payment: Option<PaymentInfo>,
    },
    /// Terminal: the tool call failed.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable error message.
        message: String,
    },
}

impl Frame {
    /// True for the two terminal variants; the dispatcher stops draining
    /// the handler's channel and closes the stream after one of these.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Structured { .. } | Self::Error { .. })
    }
}
