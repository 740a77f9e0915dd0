//! `mcp-server` — serves DAML tooling over MCP, gated by x402 payments,
//! reporting fire-and-forget UDP telemetry.

mod cli;
mod config;
mod shutdown;
mod tools;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mcp_payments::{PaymentGate, Pricing};
use mcp_rail_canton::CantonRail;
use mcp_rail_evm::EvmRail;
use mcp_registry::{
    Prompt, PromptArgument, PromptRegistry, RequestManager, Resource, ResourceRegistry, ToolDescriptor, ToolRegistry,
};
use mcp_telemetry::{AuthInfo, Connector, DiscoveryRecord, RailInfo, TelemetryEmitter};
use mcp_transport::{router, AppState, ServerInfo};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::ServerConfig;

const SERVER_NAME: &str = "daml-mcp-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let Command::Serve(config) = cli.command;

    init_tracing(&config.log_level);

    let tools = build_tool_registry()?;
    let resources = build_resource_registry();
    let prompts = build_prompt_registry();
    let requests = Arc::new(RequestManager::new());
    let gate = Arc::new(build_payment_gate(&config));
    let telemetry = build_telemetry(&config).await?;

    if let Some(emitter) = &telemetry {
        spawn_discovery_loop(emitter.clone(), &config, &gate, tools.list());
    }

    let state = AppState {
        info: ServerInfo {
            name: SERVER_NAME.to_owned(),
            version: SERVER_VERSION.to_owned(),
        },
        tools,
        resources,
        prompts,
        requests,
        gate,
        telemetry,
    };

    info!(addr = %config.bind_addr, server_url = %config.server_url, "starting mcp-server");

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await?;

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_tool_registry() -> Result<Arc<ToolRegistry>, Box<dyn std::error::Error>> {
    let registry = ToolRegistry::new();

    registry.register(
        ToolDescriptor {
            name: "echo".to_owned(),
            description: "Echoes a message back, streaming progress one word at a time.".to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": { "message": { "type": "string" } },
                "required": ["message"],
            }),
            pricing: Pricing::Free,
        },
        Arc::new(tools::EchoTool),
    )?;

    registry.register(
        ToolDescriptor {
            name: "validate".to_owned(),
            description: "Validates a DAML module/template reference.".to_owned(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "module": { "type": "string" },
                    "template": { "type": "string" },
                },
                "required": ["module", "template"],
            }),
            pricing: Pricing::Fixed { usd_cents: 5 },
        },
        Arc::new(tools::ValidateTool),
    )?;

    Ok(Arc::new(registry))
}

fn build_resource_registry() -> Arc<ResourceRegistry> {
    let mut registry = ResourceRegistry::new();
    registry.register(Resource {
        uri: "resource://daml-mcp-server/about".to_owned(),
        name: "About this server".to_owned(),
        mime_type: "application/json".to_owned(),
        content: json!({ "name": SERVER_NAME, "version": SERVER_VERSION }),
    });
    Arc::new(registry)
}

fn build_prompt_registry() -> Arc<PromptRegistry> {
    let mut registry = PromptRegistry::new();
    registry.register(Prompt {
        name: "validate-module".to_owned(),
        description: "Ask the model to validate a DAML module/template pair.".to_owned(),
        arguments: vec![
            PromptArgument {
                name: "module".to_owned(),
                description: "The DAML module name.".to_owned(),
                required: true,
            },
            PromptArgument {
                name: "template".to_owned(),
                description: "The template name within the module.".to_owned(),
                required: true,
            },
        ],
        template: "Validate that template {{template}} in module {{module}} is well-formed.".to_owned(),
    });
    Arc::new(registry)
}

fn build_payment_gate(config: &ServerConfig) -> PaymentGate {
    let mut rails: Vec<Arc<dyn mcp_payments::Rail>> = Vec::new();

    if config.evm_enabled() {
        rails.push(Arc::new(EvmRail::new(
            config.x402_network.clone(),
            config.x402_token.clone().unwrap_or_default(),
            config.x402_wallet_address.clone().unwrap_or_default(),
            config.x402_facilitator_url.clone().unwrap_or_default(),
        )));
    }

    if config.canton_enabled() {
        rails.push(Arc::new(CantonRail::new(
            config.canton_network.clone(),
            config.canton_payee_party.clone().unwrap_or_default(),
            config.canton_facilitator_url.clone().unwrap_or_default(),
        )));
    }

    PaymentGate::new(rails)
}

async fn build_telemetry(config: &ServerConfig) -> Result<Option<TelemetryEmitter>, Box<dyn std::error::Error>> {
    match config.telemetry_target() {
        Some(addr) => Ok(Some(TelemetryEmitter::spawn(addr, config.server_id()).await?)),
        None => Ok(None),
    }
}

/// Builds the `connector` block shared by every tool's discovery record.
fn build_connector(config: &ServerConfig, gate: &PaymentGate) -> Connector {
    let rails: Vec<RailInfo> = gate
        .rails_info()
        .into_iter()
        .map(|(scheme, network, asset)| RailInfo { scheme, network, asset })
        .collect();
    let auth = if rails.is_empty() { AuthInfo::None } else { AuthInfo::X402 { rails } };

    Connector {
        transport: "sse",
        endpoint: format!("{}/mcp", config.server_url),
        auth,
        protocol_version: MCP_PROTOCOL_VERSION,
    }
}

/// Emits one discovery record per registered tool, immediately and then
/// on a fixed interval, so a collector can discover this server and its
/// tools without any inbound connectivity to it.
fn spawn_discovery_loop(emitter: TelemetryEmitter, config: &ServerConfig, gate: &PaymentGate, tools: Vec<ToolDescriptor>) {
    let interval_sec = config.dcap_discover_interval_sec.max(1);
    let connector = build_connector(config, gate);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_sec));
        loop {
            interval.tick().await;
            for tool in &tools {
                emitter.emit_discovery(DiscoveryRecord::new(
                    emitter.server_id(),
                    tool.name.clone(),
                    tool.description.clone(),
                    connector.clone(),
                ));
            }
        }
    });
}
