//! How much a tool call costs, and what requirements it produces.

use serde_json::Value;

/// A tool's price, attached to its descriptor in the registry.
///
/// `Free` tools skip the gate entirely; `Fixed` tools always quote the
/// same amount regardless of arguments; `Dynamic` tools compute a price
/// from the call's arguments, clamped to a configured range (metered
/// tools — a per-token or per-row charge, say — without the gate needing
/// to know anything about what the arguments mean).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pricing {
    /// No payment required.
    Free,
    /// A fixed price, quoted in the smallest unit of each configured rail.
    Fixed {
        /// Price in USD cents; each rail converts this to its own units.
        usd_cents: u64,
    },
    /// A price computed from the call's arguments, then clamped.
    Dynamic {
        /// Floor on the computed price, in USD cents.
        min_usd_cents: u64,
        /// Ceiling on the computed price, in USD cents.
        max_usd_cents: u64,
        /// Computes a raw USD-cents price from the tool call's arguments,
        /// before clamping to `[min_usd_cents, max_usd_cents]`.
        compute_fn: fn(&Value) -> u64,
    },
}

impl Pricing {
    /// True when this pricing never requires a payment.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }

    /// The price this specific call requires, in USD cents, or `None`
    /// when the tool is free.
    #[must_use]
    pub fn required_usd_cents(&self, arguments: &Value) -> Option<u64> {
        match self {
            Self::Free => None,
            Self::Fixed { usd_cents } => Some(*usd_cents),
            Self::Dynamic {
                min_usd_cents,
                max_usd_cents,
                compute_fn,
            } => Some(compute_fn(arguments).clamp(*min_usd_cents, *max_usd_cents)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn free_pricing_needs_no_payment() {
        assert_eq!(Pricing::Free.required_usd_cents(&Value::Null), None);
    }

    #[test]
    fn fixed_pricing_ignores_arguments() {
        let pricing = Pricing::Fixed { usd_cents: 5 };
        assert_eq!(pricing.required_usd_cents(&json!({"anything": true})), Some(5));
    }

    #[test]
    fn dynamic_pricing_clamps_the_computed_price() {
        fn price_per_row(args: &Value) -> u64 {
            args.get("rows").and_then(Value::as_u64).unwrap_or(0) * 2
        }
        let pricing = Pricing::Dynamic {
            min_usd_cents: 10,
            max_usd_cents: 100,
            compute_fn: price_per_row,
        };
        assert_eq!(pricing.required_usd_cents(&json!({"rows": 1})), Some(10));
        assert_eq!(pricing.required_usd_cents(&json!({"rows": 40})), Some(80));
        assert_eq!(pricing.required_usd_cents(&json!({"rows": 1000})), Some(100));
    }
}
