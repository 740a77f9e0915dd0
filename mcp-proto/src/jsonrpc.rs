//! JSON-RPC 2.0 envelope types used for every MCP request/response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcErrorCode;

/// A JSON-RPC request id: either a number or a string, or absent for
/// a notification. Mirrors the spec's union type exactly rather than
/// normalizing to one representation, so echoing it back preserves the
/// client's original encoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// A numeric id.
    Number(i64),
    /// A string id.
    String(String),
}

impl std::fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// An inbound JSON-RPC 2.0 request or notification.
///
/// A request without an `id` is a notification: the dispatcher executes
/// it but never writes a response frame.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be `"2.0"`; the dispatcher rejects anything else.
    pub jsonrpc: String,
    /// Absent for notifications.
    pub id: Option<JsonRpcId>,
    /// The MCP method name, camelCase on the wire (e.g. `"tools/call"`).
    pub method: String,
    /// Method parameters, camelCase on the wire.
    #[serde(default)]
    pub params: Value,
}

/// An outbound JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Echoes the request's id.
    pub id: JsonRpcId,
    /// Present on success, absent on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Present on failure, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    /// Builds a success response.
    #[must_use]
    pub const fn success(id: JsonRpcId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response.
    #[must_use]
    pub fn error(id: JsonRpcId, code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcErrorObject {
                code: code.code(),
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Builds an error response carrying structured `data`, e.g. the
    /// 402 payment-required body.
    #[must_use]
    pub fn error_with_data(
        id: JsonRpcId,
        code: RpcErrorCode,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcErrorObject {
                code: code.code(),
                message: message.into(),
                data: Some(data),
            }),
        }
    }
}

/// The `error` object inside a [`JsonRpcResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorObject {
    /// JSON-RPC error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
