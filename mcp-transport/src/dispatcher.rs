//! The Protocol Dispatcher: routes every JSON-RPC method except
//! `tools/call` (which streams, and is handled by
//! [`crate::tool_dispatch`]) to its handler and produces a single
//! response envelope.

use mcp_proto::casing::{to_camel_case, to_snake_case};
use mcp_proto::error::RpcErrorCode;
use mcp_proto::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use serde_json::{json, Value};

use crate::state::AppState;

/// Dispatches one non-streaming JSON-RPC request to completion.
///
/// Returns `None` for notifications (`id` absent) — per JSON-RPC 2.0,
/// the server executes the method but never replies.
pub async fn dispatch(state: &AppState, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let params = to_snake_case(request.params);
    let id = request.id.clone();

    let result = match request.method.as_str() {
        "initialize" => Ok(initialize(state)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(tools_list(state)),
        "resources/list" => Ok(resources_list(state)),
        "resources/read" => resources_read(state, &params),
        "prompts/list" => Ok(prompts_list(state)),
        "prompts/get" => prompts_get(state, &params),
        "notifications/cancel" => {
            cancel(state, &params);
            return None;
        }
        other => Err((RpcErrorCode::MethodNotFound, format!("unknown method `{other}`"), None)),
    };

    let id = id?;
    Some(match result {
        Ok(value) => JsonRpcResponse::success(id, to_camel_case(value)),
        Err((code, message, Some(data))) => JsonRpcResponse::error_with_data(id, code, message, data),
        Err((code, message, None)) => JsonRpcResponse::error(id, code, message),
    })
}

fn initialize(state: &AppState) -> Value {
    json!({
        "protocol_version": "2024-11-05",
        "server_info": { "name": state.info.name, "version": state.info.version },
        "capabilities": {
            "tools": {},
            "resources": {},
            "prompts": {},
        },
    })
}

fn tools_list(state: &AppState) -> Value {
    let tools: Vec<Value> = state
        .tools
        .list()
        .into_iter()
        .map(|descriptor| {
            json!({
                "name": descriptor.name,
                "description": descriptor.description,
                "input_schema": descriptor.input_schema,
                "free": descriptor.pricing.is_free(),
            })
        })
        .collect();
    json!({ "tools": tools })
}

fn resources_list(state: &AppState) -> Value {
    let resources: Vec<Value> = state
        .resources
        .list()
        .iter()
        .map(|resource| {
            json!({
                "uri": resource.uri,
                "name": resource.name,
                "mime_type": resource.mime_type,
            })
        })
        .collect();
    json!({ "resources": resources })
}

fn resources_read(state: &AppState, params: &Value) -> Result<Value, (RpcErrorCode, String, Option<Value>)> {
    let uri = params
        .get("uri")
        .and_then(Value::as_str)
        .ok_or((RpcErrorCode::InvalidParams, "missing `uri`".to_owned(), None))?;

    let resource = state.resources.get(uri).ok_or_else(|| {
        (
            RpcErrorCode::MethodNotFound,
            format!("unknown resource `{uri}`"),
            Some(json!({ "uri": uri })),
        )
    })?;

    Ok(json!({
        "uri": resource.uri,
        "mime_type": resource.mime_type,
        "content": resource.content,
    }))
}

fn prompts_list(state: &AppState) -> Value {
    let prompts: Vec<Value> = state
        .prompts
        .list()
        .iter()
        .map(|prompt| {
            json!({
                "name": prompt.name,
                "description": prompt.description,
                "arguments": prompt.arguments.iter().map(|arg| json!({
                    "name": arg.name,
                    "description": arg.description,
                    "required": arg.required,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "prompts": prompts })
}

fn prompts_get(state: &AppState, params: &Value) -> Result<Value, (RpcErrorCode, String, Option<Value>)> {
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or((RpcErrorCode::InvalidParams, "missing `name`".to_owned(), None))?;

    let prompt = state.prompts.get(name).ok_or_else(|| {
        (
            RpcErrorCode::MethodNotFound,
            format!("unknown prompt `{name}`"),
            Some(json!({ "prompt": name })),
        )
    })?;

    Ok(json!({ "name": prompt.name, "template": prompt.template }))
}

fn cancel(state: &AppState, params: &Value) {
    let Some(request_id) = params.get("request_id").and_then(Value::as_str) else {
        return;
    };
    let Ok(request_id) = request_id.parse() else {
        return;
    };
    let _ = state.requests.cancel(request_id);
}
