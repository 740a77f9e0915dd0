//! A generic HTTP client for an external x402 facilitator service.
//!
//! Both rail crates (`mcp-rail-evm`, `mcp-rail-canton`) wrap one of
//! these, pointed at their respective facilitator's base URL. The
//! request/response shapes are rail-agnostic: the facilitator service
//! itself interprets the opaque `payment_payload` and `asset`/`network`
//! fields.

use std::time::Duration;

use mcp_proto::facilitator::{BoxFuture, Facilitator, FacilitatorError};
use mcp_proto::payment::{SettleRequest, SettleResponse, VerifyRequest, VerifyResponse};
use reqwest::Client;

/// Bound on `/verify`: gates the client-visible response, so it has to
/// stay short enough that a hung facilitator doesn't stall `tools/call`.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);
/// Bound on `/settle`: runs after the tool's result has already been
/// delivered, so it can afford to wait longer for a ledger write.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to one external facilitator service over HTTP, implementing
/// [`Facilitator`] by POSTing to its `/verify` and `/settle` endpoints.
#[derive(Debug, Clone)]
pub struct FacilitatorHttpClient {
    scheme: String,
    verify_url: String,
    settle_url: String,
    verify_http: Client,
    settle_http: Client,
}

impl FacilitatorHttpClient {
    /// Builds a client for the facilitator reachable at `base_url`,
    /// which will verify and settle payments for the given `scheme`.
    #[must_use]
    pub fn new(scheme: impl Into<String>, base_url: impl AsRef<str>) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        Self {
            scheme: scheme.into(),
            verify_url: format!("{base}/verify"),
            settle_url: format!("{base}/settle"),
            verify_http: Client::builder()
                .timeout(VERIFY_TIMEOUT)
                .build()
                .unwrap_or_default(),
            settle_http: Client::builder()
                .timeout(SETTLE_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Facilitator for FacilitatorHttpClient {
    fn verify(&self, request: VerifyRequest) -> BoxFuture<'_, Result<VerifyResponse, FacilitatorError>> {
        Box::pin(async move {
            let resp = self
                .verify_http
                .post(&self.verify_url)
                .json(&request)
                .send()
                .await
                .map_err(|err| FacilitatorError::Transport(err.to_string()))?;

            if !resp.status().is_success() {
                return Err(FacilitatorError::Transport(format!(
                    "facilitator returned {}",
                    resp.status()
                )));
            }

            resp.json::<VerifyResponse>()
                .await
                .map_err(|err| FacilitatorError::Transport(err.to_string()))
        })
    }

    fn settle(&self, request: SettleRequest) -> BoxFuture<'_, Result<SettleResponse, FacilitatorError>> {
        Box::pin(async move {
            let resp = self
                .settle_http
                .post(&self.settle_url)
                .json(&request)
                .send()
                .await
                .map_err(|err| FacilitatorError::Transport(err.to_string()))?;

            if !resp.status().is_success() {
                return Err(FacilitatorError::Transport(format!(
                    "facilitator returned {}",
                    resp.status()
                )));
            }

            resp.json::<SettleResponse>()
                .await
                .map_err(|err| FacilitatorError::Transport(err.to_string()))
        })
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_proto::payment::PaymentRequirement;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn requirement() -> PaymentRequirement {
        PaymentRequirement {
            scheme: "exact".to_owned(),
            network: "base".to_owned(),
            max_amount_required: "1000000".to_owned(),
            resource: "tool://validate".to_owned(),
            description: "validate tool call".to_owned(),
            asset: "0xusdc".to_owned(),
            pay_to: "0xdead".to_owned(),
            max_timeout_seconds: 60,
            extra: None,
        }
    }

    #[tokio::test]
    async fn verify_posts_to_verify_endpoint_and_parses_valid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "payer": "0xabc" })))
            .mount(&server)
            .await;

        let client = FacilitatorHttpClient::new("exact", server.uri());
        let result = client
            .verify(VerifyRequest {
                x402_version: 1,
                payment_payload: json!({}),
                payment_requirements: requirement(),
            })
            .await
            .expect("verify should succeed");

        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn verify_surfaces_transport_errors_on_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = FacilitatorHttpClient::new("exact", server.uri());
        let err = client
            .verify(VerifyRequest {
                x402_version: 1,
                payment_payload: json!({}),
                payment_requirements: requirement(),
            })
            .await
            .expect_err("verify should fail");

        assert!(matches!(err, FacilitatorError::Transport(_)));
    }
}
