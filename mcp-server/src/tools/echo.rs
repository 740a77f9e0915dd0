//! `echo` — a free tool that streams its input back, one word of
//! progress at a time, as a minimal illustration of the generator-style
//! handler contract.

use mcp_proto::frame::Frame;
use mcp_registry::{Context, FrameSender, ToolHandler};
use serde_json::{json, Value};

/// Echoes the `message` argument back, emitting a progress frame per
/// word before the terminal structured result.
pub struct EchoTool;

#[async_trait::async_trait]
impl ToolHandler for EchoTool {
    async fn call(&self, ctx: Context, arguments: Value, frames: FrameSender) {
        let message = arguments
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        let words: Vec<&str> = message.split_whitespace().collect();
        let total = words.len().max(1);

        for (index, word) in words.iter().enumerate() {
            if ctx.is_cancelled() {
                let _ = frames
                    .send(Frame::Error {
                        code: "cancelled".to_owned(),
                        message: "echo cancelled before completion".to_owned(),
                    })
                    .await;
                return;
            }
            let _ = frames
                .send(Frame::Progress {
                    current: (index + 1) as u64,
                    total: total as u64,
                    message: (*word).to_owned(),
                })
                .await;
        }

        let _ = frames
            .send(Frame::Structured {
                result: json!({ "echoed": message }),
                payment: None,
            })
            .await;
    }
}
