//! The verify -> settle lifecycle a payment-gated tool call goes through.
//!
//! Grounded on the teacher's `PaymentWrapper::process()`: quote, parse
//! the client's payment header, verify against the matching rail,
//! execute, settle, and attach the settlement result — except here
//! "execute" is the caller's job (the dispatcher runs the tool handler
//! between [`PaymentGate::verify`] and [`PaymentGate::settle`]), since a
//! tool's SSE stream may already be flowing progress frames by the time
//! settlement completes.

use std::sync::Arc;

use mcp_proto::facilitator::Facilitator;
use mcp_proto::payment::{
    PaymentInfo, PaymentRequired, PaymentRequirement, SettleRequest, VerifyRequest, VerifyResponse,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::GateError;
use crate::pricing::Pricing;

/// One payment rail: a scheme/network pair backed by a [`Facilitator`].
///
/// Implemented by `mcp-rail-evm` and `mcp-rail-canton`; the gate never
/// knows which concrete rail it is talking to.
pub trait Rail: Send + Sync {
    /// The wire scheme this rail answers for, e.g. `"exact"`.
    fn scheme(&self) -> &str;

    /// Network identifier reported in quoted requirements.
    fn network(&self) -> &str;

    /// Human-readable currency symbol this rail settles in, e.g. `"USDC"`.
    fn currency_symbol(&self) -> &str;

    /// Converts a USD-cents price into this rail's requirement, for the
    /// named `resource` (typically `tool://<name>`).
    fn quote(&self, resource: &str, usd_cents: u64) -> PaymentRequirement;

    /// The facilitator this rail verifies/settles against.
    fn facilitator(&self) -> &(dyn Facilitator + Send + Sync);
}

/// Orchestrates pricing, quoting, and the verify/settle round trip
/// against whichever configured [`Rail`] the client's payment satisfies.
pub struct PaymentGate {
    rails: Vec<Arc<dyn Rail>>,
}

impl PaymentGate {
    /// Builds a gate over the given rails, in the order they should be
    /// offered in 402 bodies (deterministic, independent of insertion
    /// order elsewhere in the binary).
    #[must_use]
    pub fn new(rails: Vec<Arc<dyn Rail>>) -> Self {
        Self { rails }
    }

    fn rail_for_scheme(&self, scheme: &str) -> Option<&Arc<dyn Rail>> {
        self.rails.iter().find(|rail| rail.scheme() == scheme)
    }

    /// Scheme, network, and asset for every configured rail, for
    /// discovery telemetry's `connector.auth` block.
    #[must_use]
    pub fn rails_info(&self) -> Vec<(String, String, String)> {
        self.rails
            .iter()
            .map(|rail| {
                let requirement = rail.quote("discovery", 0);
                (requirement.scheme, requirement.network, requirement.asset)
            })
            .collect()
    }

    /// Builds the 402 body offering every configured rail's quote for
    /// this resource and price.
    #[must_use]
    pub fn quote_all(&self, resource: &str, usd_cents: u64) -> PaymentRequired {
        PaymentRequired {
            x402_version: 1,
            accepts: self
                .rails
                .iter()
                .map(|rail| rail.quote(resource, usd_cents))
                .collect(),
            error: None,
        }
    }

    /// Runs the gate for one tool call.
    ///
    /// `arguments` is the tool call's own arguments, consulted only for
    /// [`Pricing::Dynamic`] tools. `payment_header` is the raw
    /// `X-PAYMENT` header value, if the client sent one (base64-encoded
    /// JSON matching [`VerifyRequest`]'s `payment_payload`/
    /// `payment_requirements` pair).
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when the header is malformed, no rail
    /// matches the chosen requirement's scheme, or verification fails
    /// outright (as opposed to simply being absent, which yields
    /// [`VerifiedPayment::Quote`]).
    pub async fn verify(
        &self,
        pricing: &Pricing,
        resource: &str,
        arguments: &Value,
        payment_header: Option<&str>,
    ) -> Result<VerifiedPayment, GateError> {
        let Some(usd_cents) = pricing.required_usd_cents(arguments) else {
            return Ok(VerifiedPayment::NotRequired);
        };

        let Some(header) = payment_header else {
            return Ok(VerifiedPayment::Quote(self.quote_all(resource, usd_cents)));
        };

        let request = decode_payment_header(header)?;
        let rail = self
            .rail_for_scheme(&request.payment_requirements.scheme)
            .ok_or(GateError::NoMatchingRail)?;

        info!(scheme = rail.scheme(), resource, "verifying payment");
        match rail
            .facilitator()
            .verify(request.clone())
            .await
            .map_err(GateError::VerificationFailed)?
        {
            VerifyResponse::Valid { payer } => {
                let pending = PaymentInfo::verified(
                    rail.scheme(),
                    usd_cents as f64 / 100.0,
                    header,
                    request.payment_requirements.max_amount_required.clone(),
                    rail.currency_symbol(),
                    request.payment_requirements.network.clone(),
                );
                Ok(VerifiedPayment::Valid {
                    rail: Arc::clone(rail),
                    request,
                    payer,
                    pending,
                })
            }
            VerifyResponse::Invalid {
                invalid_reason,
                invalid_message,
                ..
            } => {
                warn!(reason = %invalid_reason, "payment rejected by facilitator");
                let mut quote = self.quote_all(resource, usd_cents);
                quote.error = Some(invalid_message.unwrap_or(invalid_reason));
                Ok(VerifiedPayment::Quote(quote))
            }
        }
    }

    /// Settles an already-[`VerifiedPayment::Valid`] payment, to be
    /// called once the tool handler has produced its result.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::SettlementFailed`] when the facilitator
    /// accepts verification but rejects settlement.
    pub async fn settle(
        &self,
        rail: &Arc<dyn Rail>,
        request: VerifyRequest,
        pending: PaymentInfo,
    ) -> Result<PaymentInfo, GateError> {
        let settle_request = SettleRequest {
            x402_version: request.x402_version,
            payment_payload: request.payment_payload,
            payment_requirements: request.payment_requirements.clone(),
        };

        match rail
            .facilitator()
            .settle(settle_request)
            .await
            .map_err(GateError::SettlementFailed)?
        {
            mcp_proto::payment::SettleResponse::Success { transaction, network, .. } => {
                Ok(pending.settled(transaction, network))
            }
            mcp_proto::payment::SettleResponse::Error { error_reason, error_message, .. } => {
                Err(GateError::SettlementFailed(
                    mcp_proto::facilitator::FacilitatorError::Aborted {
                        reason: error_reason,
                        message: error_message.unwrap_or_default(),
                    },
                ))
            }
        }
    }
}

/// Result of [`PaymentGate::verify`].
pub enum VerifiedPayment {
    /// The tool is free.
    NotRequired,
    /// The client still needs to pay; here is the quote to send back.
    Quote(PaymentRequired),
    /// Verified and ready to settle once the tool result is in hand.
    Valid {
        /// The rail that verified this payment.
        rail: Arc<dyn Rail>,
        /// The original verify request, reused for settlement.
        request: VerifyRequest,
        /// The payer's address/party, if recoverable.
        payer: Option<String>,
        /// The pre-settlement snapshot, handed to the call's execution
        /// context and later folded into the post-settlement [`PaymentInfo`].
        pending: PaymentInfo,
    },
}

fn decode_payment_header(header: &str) -> Result<VerifyRequest, GateError> {
    use base64::Engine as _;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(header)
        .map_err(|err| GateError::MalformedHeader(err.to_string()))?;
    serde_json::from_slice(&decoded).map_err(|err| GateError::MalformedHeader(err.to_string()))
}
