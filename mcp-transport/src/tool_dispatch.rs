//! The Tool Dispatcher: payment-gates, executes, and settles one
//! `tools/call`, yielding the running handler's frames as SSE events.

use std::sync::Arc;
use std::time::Instant;

use axum::response::sse::Event;
use mcp_payments::{GateError, VerifiedPayment};
use mcp_proto::casing::to_camel_case;
use mcp_proto::error::RpcErrorCode;
use mcp_proto::frame::Frame;
use mcp_proto::payment::{PaymentInfo, PaymentRequired};
use mcp_registry::Context;
use mcp_telemetry::PerfRecord;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};
use uuid::Uuid;

use crate::state::AppState;

const FRAME_CHANNEL_CAPACITY: usize = 64;

/// What the dispatcher decided to do with a `tools/call` request.
pub enum ToolCallOutcome {
    /// A JSON-RPC-level error — bad method routing or invalid params,
    /// returned inside an HTTP 200 per the JSON-RPC envelope convention.
    Rejected {
        /// The JSON-RPC error code to report.
        code: RpcErrorCode,
        /// Human-readable detail.
        message: String,
        /// Contextual data to attach, for routing errors like an unknown
        /// tool name.
        data: Option<Value>,
    },
    /// The request itself is malformed outside of JSON-RPC's own error
    /// model — an unrecognized payment scheme or unparseable `X-PAYMENT`
    /// header — and should be rejected as a plain HTTP 400, not wrapped
    /// in a JSON-RPC envelope.
    BadRequest {
        /// Human-readable detail.
        message: String,
    },
    /// Payment is required and the client hasn't supplied a valid one, or
    /// the facilitator rejected what they sent — return as an HTTP 402
    /// with this body, which carries the facilitator's reason when there
    /// is one.
    PaymentRequired(PaymentRequired),
    /// Execution is underway; drain this stream as SSE events. `request_id`
    /// is surfaced to the client (as the SSE event id) so a later
    /// `notifications/cancel` can address this call.
    Streaming {
        /// The id this call was registered under.
        request_id: Uuid,
        /// The handler's frames, already wrapped for streaming.
        frames: ReceiverStream<Frame>,
    },
}

/// Dispatches `tools/call`: looks up the tool, runs it through the
/// payment gate, and either rejects, quotes, or starts streaming.
pub async fn handle(state: &AppState, params: &Value, payment_header: Option<&str>) -> ToolCallOutcome {
    let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
        return ToolCallOutcome::Rejected {
            code: RpcErrorCode::InvalidParams,
            message: "missing `name`".to_owned(),
            data: None,
        };
    };

    let tool = match state.tools.get(tool_name) {
        Ok(tool) => tool,
        Err(err) => {
            return ToolCallOutcome::Rejected {
                code: RpcErrorCode::MethodNotFound,
                message: err.to_string(),
                data: Some(json!({ "tool": tool_name })),
            };
        }
    };

    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
    let resource = format!("tool://{tool_name}");
    let usd_cents = tool.descriptor.pricing.required_usd_cents(&arguments);

    let verified = match state.gate.verify(&tool.descriptor.pricing, &resource, &arguments, payment_header).await {
        Ok(verified) => verified,
        Err(GateError::NoMatchingRail) => {
            return ToolCallOutcome::BadRequest {
                message: "no configured payment rail matches the offered scheme".to_owned(),
            };
        }
        Err(GateError::MalformedHeader(reason)) => {
            return ToolCallOutcome::BadRequest { message: format!("malformed X-PAYMENT header: {reason}") };
        }
        Err(err @ GateError::VerificationFailed(_)) => {
            let mut quote = state.gate.quote_all(&resource, usd_cents.unwrap_or(0));
            quote.error = Some(err.to_string());
            return ToolCallOutcome::PaymentRequired(quote);
        }
        Err(err) => {
            return ToolCallOutcome::Rejected {
                code: RpcErrorCode::InternalError,
                message: err.to_string(),
                data: None,
            };
        }
    };

    let (settlement, payment) = match verified {
        VerifiedPayment::NotRequired => (None, None),
        VerifiedPayment::Quote(quote) => return ToolCallOutcome::PaymentRequired(quote),
        VerifiedPayment::Valid { rail, request, pending, .. } => {
            (Some((rail, request, pending.clone())), Some(pending))
        }
    };

    let request_id = Uuid::new_v4();
    let cancel = state.requests.begin(request_id);
    let ctx = Context::new(request_id, cancel, state.telemetry.clone(), payment);

    let (outbound_tx, outbound_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
    let (handler_tx, mut handler_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);

    let handler = Arc::clone(&tool.handler);
    let gate = Arc::clone(&state.gate);
    let requests = Arc::clone(&state.requests);
    let telemetry = state.telemetry.clone();
    let tool_name_owned = tool_name.to_owned();
    let handler_ctx = ctx.clone();
    let args_for_telemetry = arguments.clone();

    tokio::spawn(async move {
        handler.call(handler_ctx, arguments, handler_tx).await;
    });

    tokio::spawn(async move {
        let started = Instant::now();
        let mut outcome = "ok";
        let mut settled_payment: Option<PaymentInfo> = None;

        while let Some(frame) = handler_rx.recv().await {
            let is_terminal = frame.is_terminal();
            let frame = if is_terminal {
                finalize_frame(frame, &gate, &settlement).await
            } else {
                frame
            };

            if let Frame::Structured { payment: Some(info), .. } = &frame {
                settled_payment = Some(info.clone());
            }
            if matches!(frame, Frame::Error { .. }) {
                outcome = "error";
            } else if ctx.is_cancelled() {
                outcome = "cancelled";
            }

            let terminal = frame.is_terminal();
            if outbound_tx.send(frame).await.is_err() || terminal {
                break;
            }
        }

        requests.complete(request_id);
        info!(%request_id, tool = %tool_name_owned, outcome, "tool call finished");

        if let Some(telemetry) = telemetry {
            let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let mut record =
                PerfRecord::new(telemetry.server_id(), tool_name_owned, elapsed, outcome == "ok", args_for_telemetry);
            if let Some(info) = settled_payment {
                record = record.with_cost(info.required_usd, info.currency_symbol);
            }
            telemetry.emit_perf(record);
        }
    });

    ToolCallOutcome::Streaming { request_id, frames: ReceiverStream::new(outbound_rx) }
}

async fn finalize_frame(
    frame: Frame,
    gate: &mcp_payments::PaymentGate,
    settlement: &Option<(Arc<dyn mcp_payments::Rail>, mcp_proto::payment::VerifyRequest, PaymentInfo)>,
) -> Frame {
    let Frame::Structured { result, .. } = frame else {
        return frame;
    };
    let Some((rail, verify_request, pending)) = settlement else {
        return Frame::Structured { result, payment: None };
    };

    match gate.settle(rail, verify_request.clone(), pending.clone()).await {
        Ok(payment) => Frame::Structured {
            result,
            payment: Some(payment),
        },
        Err(err) => {
            error!(%err, "settlement failed after successful tool execution");
            Frame::Error {
                code: "settlement_failed".to_owned(),
                message: err.to_string(),
            }
        }
    }
}

/// Converts a [`Frame`] into an SSE [`Event`], camelCasing its JSON body.
#[must_use]
pub fn frame_to_event(frame: &Frame) -> Event {
    let value = serde_json::to_value(frame).unwrap_or(Value::Null);
    let value = to_camel_case(value);
    Event::default()
        .json_data(value)
        .unwrap_or_else(|_| Event::default().data("{}"))
}
