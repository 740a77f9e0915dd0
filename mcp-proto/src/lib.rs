#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Wire types shared by every layer of the MCP tool server.
//!
//! This crate is the blockchain-agnostic foundation the rest of the
//! workspace builds on: the JSON-RPC 2.0 envelope used by the protocol
//! dispatcher, the [`Frame`] sum type streamed back over SSE, the x402
//! payment envelope (payment requirements, verify/settle requests and
//! responses), and the [`Facilitator`](facilitator::Facilitator) trait
//! that both payment rails implement. Nothing here performs I/O.
//!
//! # Modules
//!
//! - [`casing`] — recursive camelCase/snake_case JSON key translation
//! - [`error`] — protocol-level error types (JSON-RPC error codes, payment errors)
//! - [`facilitator`] — the [`facilitator::Facilitator`] trait and its error type
//! - [`frame`] — the [`frame::Frame`] streaming envelope
//! - [`jsonrpc`] — JSON-RPC 2.0 request/response/notification types
//! - [`payment`] — payment requirements, verify/settle wire types
//! - [`timestamp`] — Unix timestamp newtype used in payment windows

pub mod casing;
pub mod error;
pub mod facilitator;
pub mod frame;
pub mod jsonrpc;
pub mod payment;
pub mod timestamp;

pub use error::ProtoError;
pub use facilitator::{Facilitator, FacilitatorError};
pub use frame::Frame;
pub use jsonrpc::{JsonRpcId, JsonRpcRequest, JsonRpcResponse, RpcErrorCode};
pub use payment::{
    FacilitatorVerdict, PaymentInfo, PaymentRequired, PaymentRequirement, SettleRequest,
    SettleResponse, SettlementResult, VerifyRequest, VerifyResponse,
};
