//! Environment-driven configuration for the `serve` subcommand.

use std::net::{IpAddr, SocketAddr};

use clap::Args;
use uuid::Uuid;

/// Configuration loaded from environment variables (optionally via a
/// local `.env` file). Every field has a `clap` `env` binding so the
/// same struct doubles as CLI flags and env-var configuration, the way
/// the teacher's facilitator binary loads `HOST`/`PORT`/`CONFIG`.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address this server listens on.
    #[arg(long, env = "MCP_BIND_ADDR", default_value = "127.0.0.1:7284")]
    pub bind_addr: SocketAddr,

    /// This server's own public URL, used to build resource/tool URIs
    /// and reported as the `/mcp` endpoint in discovery records.
    #[arg(long, env = "MCP_SERVER_URL", default_value = "http://127.0.0.1:7284")]
    pub server_url: String,

    /// Log level passed to the `tracing` env filter.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Whether the x402 EVM rail is offered at all.
    #[arg(long, env = "X402_ENABLED", default_value_t = false)]
    pub x402_enabled: bool,

    /// Address EVM payments settle to.
    #[arg(long, env = "X402_WALLET_ADDRESS")]
    pub x402_wallet_address: Option<String>,

    /// EVM network name reported on the wire, e.g. `"base"`.
    #[arg(long, env = "X402_NETWORK", default_value = "base")]
    pub x402_network: String,

    /// Stablecoin contract address accepted on the EVM rail.
    #[arg(long, env = "X402_TOKEN")]
    pub x402_token: Option<String>,

    /// Base URL of the external EVM x402 facilitator service. Not part
    /// of the published env surface but structurally required to reach
    /// one; operators set it alongside the other `X402_*` vars.
    #[arg(long, env = "X402_FACILITATOR_URL")]
    pub x402_facilitator_url: Option<String>,

    /// Whether the Canton rail is offered at all.
    #[arg(long, env = "CANTON_ENABLED", default_value_t = false)]
    pub canton_enabled: bool,

    /// Base URL of the external Canton x402 facilitator service.
    #[arg(long, env = "CANTON_FACILITATOR_URL")]
    pub canton_facilitator_url: Option<String>,

    /// Party id Canton payments settle to.
    #[arg(long, env = "CANTON_PAYEE_PARTY")]
    pub canton_payee_party: Option<String>,

    /// Canton synchronizer/network id reported on the wire.
    #[arg(long, env = "CANTON_NETWORK", default_value = "canton-mainnet")]
    pub canton_network: String,

    /// Whether discovery/perf telemetry is emitted at all.
    #[arg(long, env = "DCAP_ENABLED", default_value_t = false)]
    pub dcap_enabled: bool,

    /// Multicast (or unicast) IP the telemetry collector listens on.
    #[arg(long, env = "DCAP_MULTICAST_IP")]
    pub dcap_multicast_ip: Option<IpAddr>,

    /// UDP port the telemetry collector listens on.
    #[arg(long, env = "DCAP_PORT", default_value_t = 7283)]
    pub dcap_port: u16,

    /// This server instance's stable id, reused across restarts so a
    /// collector can tell a reboot from a new server. Generated once and
    /// left unset (falling back to a fresh id every boot) if the
    /// operator doesn't pin one.
    #[arg(long, env = "DCAP_SERVER_ID")]
    pub dcap_server_id: Option<Uuid>,

    /// Human-readable server name reported in discovery records.
    #[arg(long, env = "DCAP_SERVER_NAME", default_value = "daml-mcp-server")]
    pub dcap_server_name: String,

    /// Seconds between recurring discovery broadcasts.
    #[arg(long, env = "DCAP_DISCOVER_INTERVAL_SEC", default_value_t = 30)]
    pub dcap_discover_interval_sec: u64,
}

impl ServerConfig {
    /// True when enough EVM configuration is present to enable the rail.
    #[must_use]
    pub fn evm_enabled(&self) -> bool {
        self.x402_enabled
            && self.x402_wallet_address.is_some()
            && self.x402_token.is_some()
            && self.x402_facilitator_url.is_some()
    }

    /// True when enough Canton configuration is present to enable the rail.
    #[must_use]
    pub fn canton_enabled(&self) -> bool {
        self.canton_enabled && self.canton_facilitator_url.is_some() && self.canton_payee_party.is_some()
    }

    /// The UDP address telemetry should be sent to, or `None` when
    /// telemetry is disabled or incompletely configured.
    #[must_use]
    pub fn telemetry_target(&self) -> Option<SocketAddr> {
        if !self.dcap_enabled {
            return None;
        }
        self.dcap_multicast_ip.map(|ip| SocketAddr::new(ip, self.dcap_port))
    }

    /// This server instance's stable id: the operator-pinned
    /// `DCAP_SERVER_ID` when set, otherwise a fresh id for this boot.
    #[must_use]
    pub fn server_id(&self) -> Uuid {
        self.dcap_server_id.unwrap_or_else(Uuid::new_v4)
    }
}
