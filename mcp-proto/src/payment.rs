//! The x402 payment envelope: requirements, verify/settle requests and responses.
//!
//! Shaped after the flat `PaymentRequirements` the facilitator HTTP
//! contract speaks — one scheme/network/asset/amount per requirement,
//! no CAIP-2 chain-generic nesting — since this server only ever talks
//! to two concrete rails (EVM stablecoin, Canton ledger-native).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timestamp::UnixTimestamp;

/// One way a tool call can be paid for.
///
/// The dispatcher may offer several of these in a single 402 body (one
/// per configured rail); the client picks whichever it can satisfy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRequirement {
    /// Payment scheme identifier, e.g. `"exact"` or `"exact-canton"`.
    pub scheme: String,
    /// Network identifier for the rail (chain name or ledger id).
    pub network: String,
    /// Smallest-unit amount required, as a decimal string (avoids float
    /// precision loss for large token amounts).
    #[serde(rename = "maxAmountRequired")]
    pub max_amount_required: String,
    /// Opaque resource identifier the payment is for (tool name/URI).
    pub resource: String,
    /// Human-readable description shown to the payer.
    pub description: String,
    /// Asset identifier (contract address, instrument symbol, ...).
    pub asset: String,
    /// Address/party the payment must be made to.
    #[serde(rename = "payTo")]
    pub pay_to: String,
    /// Seconds after issuance the requirement stays valid.
    #[serde(rename = "maxTimeoutSeconds")]
    pub max_timeout_seconds: u64,
    /// Scheme-specific extra data (e.g. EIP-712 domain, Canton template id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

/// The full HTTP 402 response body: every acceptable way to pay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRequired {
    /// Protocol version of this 402 body shape.
    pub x402_version: u32,
    /// The requirements the client may satisfy, in deterministic order.
    pub accepts: Vec<PaymentRequirement>,
    /// Optional human-readable error, set when this 402 follows a failed
    /// verification attempt rather than an initial quote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A client's submitted payment payload, opaque to the core — each rail
/// knows how to interpret its own `payload` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Protocol version of the payload.
    pub x402_version: u32,
    /// Rail-specific signed payload.
    pub payment_payload: Value,
    /// The requirement this payment is supposed to satisfy.
    pub payment_requirements: PaymentRequirement,
}

/// Result of verifying a payment payload, before any ledger/chain write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerifyResponse {
    /// The payload is well-formed and authorizes the required amount.
    Valid {
        /// The payer's address/party, when recoverable from the payload.
        payer: Option<String>,
    },
    /// The payload failed verification.
    Invalid {
        /// Machine-readable reason.
        invalid_reason: String,
        /// Human-readable detail.
        invalid_message: Option<String>,
        /// The payer's address/party, when recoverable.
        payer: Option<String>,
    },
}

impl VerifyResponse {
    /// True when verification succeeded.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// A request to settle an already-verified payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleRequest {
    /// Protocol version of the payload.
    pub x402_version: u32,
    /// Rail-specific signed payload (same one that was verified).
    pub payment_payload: Value,
    /// The requirement this payment satisfies.
    pub payment_requirements: PaymentRequirement,
}

/// Result of settling a payment on the underlying rail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettleResponse {
    /// Settlement succeeded.
    Success {
        /// The payer's address/party.
        payer: Option<String>,
        /// Rail-specific transaction/offer reference.
        transaction: String,
        /// The network the settlement happened on.
        network: String,
    },
    /// Settlement failed after verification had already succeeded.
    Error {
        /// Machine-readable reason.
        error_reason: String,
        /// Human-readable detail.
        error_message: Option<String>,
        /// The payer's address/party, when known.
        payer: Option<String>,
    },
}

impl SettleResponse {
    /// True when settlement completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Where a verified payment currently stands with the facilitator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FacilitatorVerdict {
    /// Not yet checked against a facilitator.
    Unknown,
    /// The facilitator accepted the payload.
    Verified,
    /// The facilitator rejected the payload.
    Rejected,
}

/// Where an already-verified payment stands in the settle step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettlementResult {
    /// Settlement has not been attempted yet.
    Pending,
    /// Settlement completed on-ledger/on-chain.
    Settled,
    /// Settlement was attempted and failed.
    Failed,
}

/// Records that a payment was required and what it cost, threaded from
/// the payment gate into the call's [`crate::frame::Frame`] and
/// [`Context`](mod@crate) — built once verification succeeds, then
/// updated once settlement finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Which rail verified/settled the call, e.g. `"exact"` or `"exact-canton"`.
    pub rail: String,
    /// The price charged, in whole USD (not cents, not atomic units).
    pub required_usd: f64,
    /// The opaque `X-PAYMENT` header value this payment was verified from.
    pub raw_envelope: String,
    /// The facilitator's verification verdict.
    pub facilitator_verdict: FacilitatorVerdict,
    /// Where settlement stands.
    pub settlement_result: SettlementResult,
    /// The required amount in the rail's smallest unit, as a decimal string.
    pub amount_atomic: String,
    /// Human-readable currency symbol, e.g. `"USDC"` or `"CC"`.
    pub currency_symbol: String,
    /// The network the payment was quoted/settled on.
    pub network: String,
    /// Settlement transaction/offer reference, set once settled.
    pub transaction: Option<String>,
    /// When settlement completed.
    pub settled_at: Option<UnixTimestamp>,
}

impl PaymentInfo {
    /// Builds the snapshot recorded right after facilitator verification,
    /// before settlement has been attempted.
    #[must_use]
    pub fn verified(
        rail: impl Into<String>,
        required_usd: f64,
        raw_envelope: impl Into<String>,
        amount_atomic: impl Into<String>,
        currency_symbol: impl Into<String>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            rail: rail.into(),
            required_usd,
            raw_envelope: raw_envelope.into(),
            facilitator_verdict: FacilitatorVerdict::Verified,
            settlement_result: SettlementResult::Pending,
            amount_atomic: amount_atomic.into(),
            currency_symbol: currency_symbol.into(),
            network: network.into(),
            transaction: None,
            settled_at: None,
        }
    }

    /// Folds a successful settlement into this snapshot.
    #[must_use]
    pub fn settled(mut self, transaction: impl Into<String>, network: impl Into<String>) -> Self {
        self.settlement_result = SettlementResult::Settled;
        self.transaction = Some(transaction.into());
        self.network = network.into();
        self.settled_at = Some(UnixTimestamp::now());
        self
    }

    /// Marks this snapshot as having failed settlement.
    #[must_use]
    pub fn failed(mut self) -> Self {
        self.settlement_result = SettlementResult::Failed;
        self
    }
}
