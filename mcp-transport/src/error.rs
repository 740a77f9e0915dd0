//! Transport-level error types.

/// Failures the HTTP layer itself can produce, distinct from a
/// well-formed JSON-RPC error response (which is a *success* at the
/// transport level — the failure lives inside the envelope).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The request body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),
    /// The request was valid JSON but not a valid JSON-RPC envelope.
    #[error("invalid JSON-RPC envelope: {0}")]
    InvalidEnvelope(String),
}
