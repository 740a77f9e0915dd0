//! Tool descriptors and the handler trait tools implement.

use mcp_payments::Pricing;
use mcp_proto::frame::Frame;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::context::Context;

/// What a client sees when it lists tools: name, description, input
/// shape, and whether calling it costs money.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Unique tool name, used both in `tools/list` and `tools/call`.
    pub name: String,
    /// Human-readable description shown to the client/model.
    pub description: String,
    /// JSON Schema the tool's arguments must satisfy.
    pub input_schema: Value,
    /// This tool's price.
    pub pricing: Pricing,
}

/// A running tool call's output channel. Handlers push zero or more
/// progress/log frames followed by exactly one terminal frame
/// ([`Frame::Structured`] or [`Frame::Error`]); pushing after a
/// terminal frame is a handler bug the dispatcher ignores rather than
/// panics on, since a misbehaving handler should degrade, not crash the
/// server.
pub type FrameSender = mpsc::Sender<Frame>;

/// A tool implementation. Generator-style rather than callback-style:
/// the handler owns the sender and decides its own pacing, which keeps
/// streaming handlers and fire-and-forget handlers symmetric (both just
/// `send` into the channel and return).
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool, streaming frames to `frames` as it goes. The
    /// implementation should check `ctx.is_cancelled()` at any point it
    /// can cheaply stop and, if cancelled, send a terminal
    /// [`Frame::Error`] rather than silently stopping — the dispatcher
    /// will also close the stream on its own detection of cancellation,
    /// but a cooperative handler gives a cleaner client-visible error.
    async fn call(&self, ctx: Context, arguments: Value, frames: FrameSender);
}

/// A registered tool: its descriptor plus the handler that executes it.
pub struct RegisteredTool {
    /// Metadata shown to clients.
    pub descriptor: ToolDescriptor,
    /// The implementation invoked on `tools/call`.
    pub handler: std::sync::Arc<dyn ToolHandler>,
}
