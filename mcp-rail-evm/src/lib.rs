#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! The EVM-stablecoin payment rail (`exact` scheme).
//!
//! Quotes and settles payments in a stablecoin (USDC-class, 6 decimals)
//! on whichever EVM network the operator configures. All on-chain
//! verification and settlement happens in the external facilitator
//! service; this crate only shapes requirements and forwards to it.

use mcp_payments::{FacilitatorHttpClient, Rail};
use mcp_proto::facilitator::Facilitator;
use mcp_proto::payment::PaymentRequirement;

/// Smallest-unit decimals for the configured stablecoin (USDC-class).
const ASSET_DECIMALS: u32 = 6;

/// Converts a USD-cents price into the stablecoin's smallest unit.
#[must_use]
pub fn usd_cents_to_atomic(usd_cents: u64) -> String {
    // usd_cents is hundredths of a dollar; the asset has ASSET_DECIMALS
    // decimals, so atomic = usd_cents * 10^(decimals - 2).
    let scale = 10u64.pow(ASSET_DECIMALS - 2);
    (usd_cents * scale).to_string()
}

/// The `exact` rail: one stablecoin, one network, one facilitator.
#[derive(Debug)]
pub struct EvmRail {
    network: String,
    asset: String,
    pay_to: String,
    max_timeout_seconds: u64,
    facilitator: FacilitatorHttpClient,
}

impl EvmRail {
    /// Builds the rail.
    ///
    /// - `network` — EVM network name reported on the wire (e.g. `"base"`).
    /// - `asset` — the stablecoin's contract address.
    /// - `pay_to` — the address payments settle to.
    /// - `facilitator_url` — base URL of the external EVM facilitator service.
    #[must_use]
    pub fn new(
        network: impl Into<String>,
        asset: impl Into<String>,
        pay_to: impl Into<String>,
        facilitator_url: impl AsRef<str>,
    ) -> Self {
        Self {
            network: network.into(),
            asset: asset.into(),
            pay_to: pay_to.into(),
            max_timeout_seconds: 120,
            facilitator: FacilitatorHttpClient::new("exact", facilitator_url),
        }
    }
}

impl Rail for EvmRail {
    fn scheme(&self) -> &str {
        "exact"
    }

    fn network(&self) -> &str {
        &self.network
    }

    fn currency_symbol(&self) -> &str {
        "USDC"
    }

    fn quote(&self, resource: &str, usd_cents: u64) -> PaymentRequirement {
        PaymentRequirement {
            scheme: self.scheme().to_owned(),
            network: self.network.clone(),
            max_amount_required: usd_cents_to_atomic(usd_cents),
            resource: resource.to_owned(),
            description: format!("Payment for {resource}"),
            asset: self.asset.clone(),
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
    fn converts_whole_dollars_to_six_decimal_atomic_units() {
        assert_eq!(usd_cents_to_atomic(100), "1000000");
        assert_eq!(usd_cents_to_atomic(1), "10000");
        assert_eq!(usd_cents_to_atomic(250), "2500000");
    }

    #[test]
    fn quote_carries_the_resource_and_configured_addresses() {
        let rail = EvmRail::new("base", "0xusdc", "0xdead", "http://localhost:9000");
        let req = rail.quote("tool://validate", 50);
        assert_eq!(req.scheme, "exact");
        assert_eq!(req.network, "base");
        assert_eq!(req.max_amount_required, "500000");
        assert_eq!(req.resource, "tool://validate");
        assert_eq!(req.pay_to, "0xdead");
    }
}
