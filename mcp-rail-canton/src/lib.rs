#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! The Canton ledger-native payment rail (`exact-canton` scheme).
//!
//! Canton settles in Canton Coin (CC) directly on the ledger rather than
//! through an EVM-style token contract, so amounts are quoted as decimal
//! CC strings (via [`rust_decimal::Decimal`]) instead of integer atomic
//! units, and `pay_to` names a ledger party id (`Party::<fingerprint>`)
//! rather than an address. There is no prior first-party precedent for
//! this rail in the surrounding codebase; its shape is modeled directly
//! on the generic x402 facilitator contract `mcp-payments` already
//! speaks, differing from `mcp-rail-evm` only in unit conversion and
//! identifier format.

use mcp_payments::{FacilitatorHttpClient, Rail};
use mcp_proto::facilitator::Facilitator;
use mcp_proto::payment::PaymentRequirement;
use rust_decimal::Decimal;

/// Converts a USD-cents price into a decimal Canton Coin amount string,
/// at the current 1:1 USD peg.
#[must_use]
pub fn usd_cents_to_cc(usd_cents: u64) -> String {
    Decimal::new(i64::try_from(usd_cents).unwrap_or(i64::MAX), 2).to_string()
}

/// The `exact-canton` rail: one party, one facilitator, the CC instrument.
#[derive(Debug)]
pub struct CantonRail {
    network: String,
    pay_to: String,
    max_timeout_seconds: u64,
    facilitator: FacilitatorHttpClient,
}

impl CantonRail {
    /// Builds the rail.
    ///
    /// - `network` — the Canton synchronizer/network id reported on the wire.
    /// - `pay_to` — the receiving party id, e.g. `"Party::abcd1234"`.
    /// - `facilitator_url` — base URL of the external Canton facilitator service.
    #[must_use]
    pub fn new(network: impl Into<String>, pay_to: impl Into<String>, facilitator_url: impl AsRef<str>) -> Self {
        Self {
            network: network.into(),
            pay_to: pay_to.into(),
            max_timeout_seconds: 120,
            facilitator: FacilitatorHttpClient::new("exact-canton", facilitator_url),
        }
    }
}

impl Rail for CantonRail {
    fn scheme(&self) -> &str {
        "exact-canton"
    }

    fn network(&self) -> &str {
        &self.network
    }

    fn currency_symbol(&self) -> &str {
        "CC"
    }

    fn quote(&self, resource: &str, usd_cents: u64) -> PaymentRequirement {
        PaymentRequirement {
            scheme: self.scheme().to_owned(),
            network: self.network.clone(),
            max_amount_required: usd_cents_to_cc(usd_cents),
            resource: resource.to_owned(),
            description: format!("Payment for {resource}"),
            asset: "CC".to_owned(),
            pay_to: self.pay_to.clone(),
            max_timeout_seconds: self.max_timeout_seconds,
            extra: None,
        }
    }

    fn facilitator(&self) -> &(dyn Facilitator + Send + Sync) {
        &self.facilitator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_cents_to_a_two_decimal_cc_amount() {
        assert_eq!(usd_cents_to_cc(100), "1.00");
        assert_eq!(usd_cents_to_cc(50), "0.50");
        assert_eq!(usd_cents_to_cc(1), "0.01");
    }

    #[test]
    fn quote_uses_the_cc_instrument_and_configured_party() {
        let rail = CantonRail::new("canton-mainnet", "Party::abcd1234", "http://localhost:9100");
        let req = rail.quote("tool://validate", 250);
        assert_eq!(req.scheme, "exact-canton");
        assert_eq!(req.asset, "CC");
        assert_eq!(req.max_amount_required, "2.50");
        assert_eq!(req.pay_to, "Party::abcd1234");
    }
}
