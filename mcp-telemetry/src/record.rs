//! Wire shape of the two telemetry record kinds.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Maximum bytes a single UDP datagram is allowed to carry. Records
/// whose serialized form would exceed this are truncated (`ctx.args` is
/// shortened first; every other field is preserved) rather than dropped
/// outright, so the collector still sees that an event happened.
pub const MAX_PACKET_BYTES: usize = 1200;

/// Telemetry wire format version, bumped on any breaking field change.
const TELEMETRY_VERSION: u32 = 2;

/// The truncatable context carried alongside a perf record.
#[derive(Debug, Clone, Serialize)]
pub struct PerfContext {
    /// The tool call's arguments, shortened first when a record is oversized.
    pub args: Value,
}

/// Emitted once per completed tool call.
#[derive(Debug, Clone, Serialize)]
pub struct PerfRecord {
    /// Telemetry wire format version.
    pub v: u32,
    /// Record discriminant, always `"perf_update"`.
    pub t: &'static str,
    /// Unix seconds this record was emitted.
    pub ts: u64,
    /// This server instance's stable id.
    pub sid: Uuid,
    /// The tool that was invoked.
    pub tool: String,
    /// Wall-clock duration of the call, in milliseconds.
    pub exec_ms: u64,
    /// Whether the call completed without error or cancellation.
    pub success: bool,
    /// Truncatable call context.
    pub ctx: PerfContext,
    /// Amount charged, in whole USD, when the call was payment-gated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_paid: Option<f64>,
    /// Currency symbol for `cost_paid`, e.g. `"USDC"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl PerfRecord {
    /// Builds a record for a completed call.
    #[must_use]
    pub fn new(sid: Uuid, tool: impl Into<String>, exec_ms: u64, success: bool, args: Value) -> Self {
        Self {
            v: TELEMETRY_VERSION,
            t: "perf_update",
            ts: now_secs(),
            sid,
            tool: tool.into(),
            exec_ms,
            success,
            ctx: PerfContext { args },
            cost_paid: None,
            currency: None,
        }
    }

    /// Attaches the amount charged for this call.
    #[must_use]
    pub fn with_cost(mut self, cost_paid: f64, currency: impl Into<String>) -> Self {
        self.cost_paid = Some(cost_paid);
        self.currency = Some(currency.into());
        self
    }

    /// Serializes to JSON, truncating `ctx.args` until the encoding fits
    /// within [`MAX_PACKET_BYTES`]; every other field is preserved as-is.
    #[must_use]
    pub fn to_bounded_json(&self) -> Vec<u8> {
        let mut record = self.clone();
        loop {
            let encoded = serde_json::to_vec(&record).unwrap_or_default();
            if encoded.len() <= MAX_PACKET_BYTES || !shrink(&mut record.ctx.args) {
                return encoded;
            }
        }
    }
}

/// One rail this server advertises for payment, as reported in a
/// discovery record's `connector.auth` block.
#[derive(Debug, Clone, Serialize)]
pub struct RailInfo {
    /// Wire scheme, e.g. `"exact"` or `"exact-canton"`.
    pub scheme: String,
    /// Network identifier this rail settles on.
    pub network: String,
    /// Asset/instrument identifier.
    pub asset: String,
}

/// How a client authenticates/pays to reach this server's tools.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthInfo {
    /// No payment gate configured.
    None,
    /// x402-gated, with the enabled rails listed.
    X402 {
        /// Every rail currently configured.
        rails: Vec<RailInfo>,
    },
}

/// How a client reaches this server, reported in a discovery record.
#[derive(Debug, Clone, Serialize)]
pub struct Connector {
    /// Transport kind, always `"sse"`.
    pub transport: &'static str,
    /// The `/mcp` endpoint URL clients should POST to.
    pub endpoint: String,
    /// Payment/auth configuration.
    pub auth: AuthInfo,
    /// MCP protocol version this server speaks.
    pub protocol_version: &'static str,
}

/// Emitted once per registered tool at startup and then on a fixed
/// interval, so a collector can discover live servers and their tools
/// without any inbound connectivity to them.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryRecord {
    /// Telemetry wire format version.
    pub v: u32,
    /// Record discriminant, always `"semantic_discover"`.
    pub t: &'static str,
    /// Unix seconds this record was emitted.
    pub ts: u64,
    /// This server instance's stable id.
    pub sid: Uuid,
    /// The tool this record describes.
    pub tool: String,
    /// The tool's description, as shown in `tools/list`.
    pub description: String,
    /// How to reach this server to call the tool.
    pub connector: Connector,
}

impl DiscoveryRecord {
    /// Builds a discovery record for one registered tool.
    #[must_use]
    pub fn new(sid: Uuid, tool: impl Into<String>, description: impl Into<String>, connector: Connector) -> Self {
        Self {
            v: TELEMETRY_VERSION,
            t: "semantic_discover",
            ts: now_secs(),
            sid,
            tool: tool.into(),
            description: description.into(),
            connector,
        }
    }

    /// Serializes to JSON, truncating `description` until the encoding
    /// fits within [`MAX_PACKET_BYTES`].
    #[must_use]
    pub fn to_bounded_json(&self) -> Vec<u8> {
        let mut record = self.clone();
        loop {
            let encoded = serde_json::to_vec(&record).unwrap_or_default();
            if encoded.len() <= MAX_PACKET_BYTES || record.description.len() <= 8 {
                return encoded;
            }
            let keep = record.description.len().saturating_sub(16).max(8);
            record.description.truncate(keep);
            record.description.push('\u{2026}');
        }
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Shrinks `args` by one step; returns `false` once nothing more can be
/// dropped.
fn shrink(args: &mut Value) -> bool {
    match args {
        Value::Object(map) if !map.is_empty() => {
            let Some(key) = map.keys().next().cloned() else {
                return false;
            };
            map.remove(&key);
            true
        }
        Value::Array(items) if !items.is_empty() => {
            items.pop();
            true
        }
        Value::String(s) if s.len() > 8 => {
            let keep = s.len().saturating_sub(16).max(8);
            s.truncate(keep);
            s.push('\u{2026}');
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn perf_record_fits_without_truncation_when_small() {
        let record = PerfRecord::new(Uuid::nil(), "echo", 12, true, json!({"message": "hi"}));
        let encoded = record.to_bounded_json();
        assert!(encoded.len() <= MAX_PACKET_BYTES);
        let parsed: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(parsed["tool"], "echo");
        assert_eq!(parsed["t"], "perf_update");
    }

    #[test]
    fn perf_record_truncates_oversized_args_without_dropping_other_fields() {
        let huge_args = json!({"blob": "x".repeat(4000)});
        let record = PerfRecord::new(Uuid::nil(), "echo", 1, true, huge_args);
        let encoded = record.to_bounded_json();
        assert!(encoded.len() <= MAX_PACKET_BYTES);
        let parsed: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(parsed["tool"], "echo");
    }

    #[test]
    fn perf_record_carries_cost_when_payment_gated() {
        let record = PerfRecord::new(Uuid::nil(), "validate", 5, true, json!({})).with_cost(0.10, "USDC");
        let encoded = record.to_bounded_json();
        let parsed: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(parsed["cost_paid"], json!(0.10));
        assert_eq!(parsed["currency"], json!("USDC"));
    }

    #[test]
    fn discovery_record_truncates_an_oversized_description() {
        let connector = Connector {
            transport: "sse",
            endpoint: "http://localhost:7284/mcp".to_owned(),
            auth: AuthInfo::None,
            protocol_version: "2024-11-05",
        };
        let record = DiscoveryRecord::new(Uuid::nil(), "validate", "x".repeat(4000), connector);
        let encoded = record.to_bounded_json();
        assert!(encoded.len() <= MAX_PACKET_BYTES);
    }
}
