//! `validate` — a fixed-priced tool that checks a DAML module reference
//! for the shape a real tool body would need before doing anything
//! expensive with it. Stands in for the opaque paid-tool contract: the
//! dispatcher's payment gate is exercised identically regardless of
//! what the handler itself actually computes.

use mcp_proto::frame::Frame;
use mcp_registry::{Context, FrameSender, ToolHandler};
use serde_json::{json, Value};

/// Checks that `module` and `template` string fields are present and
/// non-empty.
pub struct ValidateTool;

#[async_trait::async_trait]
impl ToolHandler for ValidateTool {
    async fn call(&self, _ctx: Context, arguments: Value, frames: FrameSender) {
        let _ = frames
            .send(Frame::Progress {
                current: 1,
                total: 2,
                message: "checking module reference".to_owned(),
            })
            .await;

        let module = arguments.get("module").and_then(Value::as_str).unwrap_or_default();
        let template = arguments.get("template").and_then(Value::as_str).unwrap_or_default();

        let frame = if module.is_empty() || template.is_empty() {
            Frame::Error {
                code: "invalid_arguments".to_owned(),
                message: "both `module` and `template` must be non-empty strings".to_owned(),
            }
        } else {
            Frame::Structured {
                result: json!({ "module": module, "template": template, "valid": true }),
                payment: None,
            }
        };

        let _ = frames.send(frame).await;
    }
}
