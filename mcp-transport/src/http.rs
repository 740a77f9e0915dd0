//! The axum HTTP surface: `POST /mcp`, `GET /health`, `GET /mcp-info`.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::StreamExt as _;
use mcp_proto::casing::to_snake_case;
use mcp_proto::error::RpcErrorCode;
use mcp_proto::jsonrpc::{JsonRpcId, JsonRpcRequest, JsonRpcResponse};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::dispatcher;
use crate::state::AppState;
use crate::tool_dispatch::{self, ToolCallOutcome};

/// Header the client sends its x402 payment payload in.
pub const PAYMENT_HEADER_NAME: &str = "X-PAYMENT";

/// Builds the complete router for the given state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/health", get(health))
        .route("/mcp-info", get(mcp_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn mcp_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.info.name,
        "version": state.info.version,
        "tool_count": state.tools.len(),
    }))
}

#[instrument(skip_all, fields(method))]
async fn handle_mcp(State(state): State<AppState>, headers: HeaderMap, body: axum::body::Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            let response =
                JsonRpcResponse::error(JsonRpcId::String(String::new()), RpcErrorCode::ParseError, err.to_string());
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    tracing::Span::current().record("method", request.method.as_str());

    if request.method == "tools/call" {
        return handle_tool_call(&state, request, &headers).await;
    }

    match dispatcher::dispatch(&state, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn handle_tool_call(state: &AppState, request: JsonRpcRequest, headers: &HeaderMap) -> Response {
    let Some(id) = request.id else {
        // tools/call as a notification makes no sense; treat it as a
        // notification anyway per JSON-RPC semantics and do nothing.
        return StatusCode::NO_CONTENT.into_response();
    };

    let params = to_snake_case(request.params);
    let payment_header = headers
        .get(PAYMENT_HEADER_NAME)
        .and_then(|value| value.to_str().ok());

    match tool_dispatch::handle(state, &params, payment_header).await {
        ToolCallOutcome::Rejected { code, message, data } => {
            let response = match data {
                Some(data) => JsonRpcResponse::error_with_data(id, code, message, data),
                None => JsonRpcResponse::error(id, code, message),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        ToolCallOutcome::BadRequest { message } => (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response(),
        ToolCallOutcome::PaymentRequired(quote) => (StatusCode::PAYMENT_REQUIRED, Json(quote)).into_response(),
        ToolCallOutcome::Streaming { request_id, frames } => {
            let events = frames.map(move |frame| {
                Ok::<_, std::convert::Infallible>(tool_dispatch::frame_to_event(&frame).id(request_id.to_string()))
            });
            Sse::new(events).keep_alive(KeepAlive::default()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use mcp_payments::PaymentGate;
    use mcp_registry::{PromptRegistry, RequestManager, ResourceRegistry, ToolRegistry};
    use std::sync::Arc;
    use tower::ServiceExt as _;

    fn test_state() -> AppState {
        AppState {
            info: crate::state::ServerInfo {
                name: "daml-mcp-server".to_owned(),
                version: "0.1.0".to_owned(),
            },
            tools: Arc::new(ToolRegistry::new()),
            resources: Arc::new(ResourceRegistry::new()),
            prompts: Arc::new(PromptRegistry::new()),
            requests: Arc::new(RequestManager::new()),
            gate: Arc::new(PaymentGate::new(vec![])),
            telemetry: None,
        }
    }

    #[tokio::test]
    async fn health_check_returns_200() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn initialize_returns_server_info() {
        let app = router(test_state());
        let body = json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_method_returns_method_not_found_error() {
        let app = router(test_state());
        let body = json!({ "jsonrpc": "2.0", "id": 1, "method": "bogus" });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["error"]["code"], json!(-32601));
    }

    #[tokio::test]
    async fn notification_without_id_returns_no_content() {
        let app = router(test_state());
        let body = json!({ "jsonrpc": "2.0", "method": "notifications/cancel", "params": {} });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn calling_an_unknown_tool_returns_a_jsonrpc_error_not_an_http_error() {
        let app = router(test_state());
        let body = json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": { "name": "nope" } });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["error"]["code"], json!(-32601));
        assert_eq!(parsed["error"]["data"]["tool"], json!("nope"));
    }
}
