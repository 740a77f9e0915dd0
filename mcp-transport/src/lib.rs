#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! The MCP HTTP transport: the JSON-RPC Protocol Dispatcher, the
//! streaming Tool Dispatcher, and the axum server that wires both up
//! behind `POST /mcp`.
//!
//! # Modules
//!
//! - [`dispatcher`] — non-streaming JSON-RPC methods
//! - [`error`] — [`error::TransportError`]
//! - [`http`] — the axum [`http::router`] and its handlers
//! - [`state`] — [`state::AppState`] shared across handlers
//! - [`tool_dispatch`] — payment-gated, streaming `tools/call`

pub mod dispatcher;
pub mod error;
pub mod http;
pub mod state;
pub mod tool_dispatch;

pub use error::TransportError;
pub use http::{router, PAYMENT_HEADER_NAME};
pub use state::{AppState, ServerInfo};
