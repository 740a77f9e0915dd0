//! The [`Facilitator`] trait: the uniform interface both payment rails
//! implement over their external HTTP facilitator service.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{AsPaymentProblem, ErrorReason, PaymentProblem};
use crate::payment::{SettleRequest, SettleResponse, VerifyRequest, VerifyResponse};

/// Boxed future type alias for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors a rail's facilitator call can fail with.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FacilitatorError {
    /// The facilitator rejected the payment payload as invalid.
    #[error("payment verification failed: {reason}")]
    Invalid {
        /// Machine-readable reason returned by the facilitator.
        reason: String,
        /// Human-readable detail, if any.
        message: Option<String>,
    },
    /// Settlement failed on the underlying ledger/chain.
    #[error("settlement failed: {0}")]
    SettlementFailed(String),
    /// The facilitator could not be reached or returned a transport error.
    #[error("facilitator unreachable: {0}")]
    Transport(String),
    /// The facilitator rejected the request outright (a lifecycle abort).
    #[error("{reason}: {message}")]
    Aborted {
        /// Machine-readable abort reason.
        reason: String,
        /// Human-readable abort message.
        message: String,
    },
    /// Any other error not covered by the specific variants.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl AsPaymentProblem for FacilitatorError {
    fn as_payment_problem(&self) -> PaymentProblem {
        match self {
            Self::Invalid { reason, message } => PaymentProblem::new(
                ErrorReason::InvalidPayload,
                message.clone().unwrap_or_else(|| reason.clone()),
            ),
            Self::SettlementFailed(detail) => {
                PaymentProblem::new(ErrorReason::SettlementFailed, detail.clone())
            }
            Self::Transport(detail) => {
                PaymentProblem::new(ErrorReason::UnexpectedError, detail.clone())
            }
            Self::Aborted { reason, message } => {
                PaymentProblem::new(ErrorReason::UnexpectedError, format!("{reason}: {message}"))
            }
            Self::Other(err) => PaymentProblem::new(ErrorReason::UnexpectedError, err.to_string()),
        }
    }
}

/// Verifies and settles payments against one external facilitator
/// service. Implemented once per rail (EVM, Canton); the payment gate
/// holds a `HashMap<scheme, Arc<dyn Facilitator>>` and dispatches on the
/// scheme named in the client's chosen [`crate::payment::PaymentRequirement`].
pub trait Facilitator: Send + Sync {
    /// Asks the facilitator whether a proposed payment payload satisfies
    /// its declared requirements, without committing anything.
    fn verify(&self, request: VerifyRequest) -> BoxFuture<'_, Result<VerifyResponse, FacilitatorError>>;

    /// Commits an already-verified payment on the underlying rail.
    fn settle(&self, request: SettleRequest) -> BoxFuture<'_, Result<SettleResponse, FacilitatorError>>;

    /// The wire scheme identifier this facilitator handles, e.g. `"exact"`.
    fn scheme(&self) -> &str;
}

impl<T: Facilitator> Facilitator for Arc<T> {
    fn verify(&self, request: VerifyRequest) -> BoxFuture<'_, Result<VerifyResponse, FacilitatorError>> {
        self.as_ref().verify(request)
    }

    fn settle(&self, request: SettleRequest) -> BoxFuture<'_, Result<SettleResponse, FacilitatorError>> {
        self.as_ref().settle(request)
    }

    fn scheme(&self) -> &str {
        self.as_ref().scheme()
    }
}
