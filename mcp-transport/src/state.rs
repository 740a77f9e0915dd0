//! Shared server state threaded through every axum handler.

use std::sync::Arc;

use mcp_payments::PaymentGate;
use mcp_registry::{PromptRegistry, RequestManager, ResourceRegistry, ToolRegistry};
use mcp_telemetry::TelemetryEmitter;

/// Static facts about this server instance, reported by `initialize`
/// and `/mcp-info`.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Server name reported to clients.
    pub name: String,
    /// Server version reported to clients.
    pub version: String,
}

/// Everything the transport layer needs to serve requests, cloned
/// cheaply (everything inside is already `Arc`-backed) into each axum
/// handler via the `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Static server identity.
    pub info: ServerInfo,
    /// Registered tools.
    pub tools: Arc<ToolRegistry>,
    /// Registered resources.
    pub resources: Arc<ResourceRegistry>,
    /// Registered prompts.
    pub prompts: Arc<PromptRegistry>,
    /// In-flight request tracking for cancellation.
    pub requests: Arc<RequestManager>,
    /// The payment gate, covering every configured rail.
    pub gate: Arc<PaymentGate>,
    /// Telemetry emitter, absent when telemetry is disabled.
    pub telemetry: Option<TelemetryEmitter>,
}
