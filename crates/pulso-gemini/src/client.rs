// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini Generative Language API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication, quota detection, and transient error retry.

use std::time::Duration;

use pulso_core::PulsoError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for Gemini API communication.
///
/// Retries once on 500/503. A 429 or any `RESOURCE_EXHAUSTED` error is
/// reported as [`PulsoError::QuotaExceeded`] without retrying.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeminiClient {
    /// Creates a client authenticated with `api_key` against `base_url`
    /// (for example `https://generativelanguage.googleapis.com/v1beta`).
    ///
    /// `timeout` bounds each HTTP request. `None` leaves requests unbounded.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, PulsoError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| PulsoError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PulsoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Shortens the pause between retries.
    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    /// Sends a `generateContent` request and returns the parsed response.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, PulsoError> {
        let url = format!("{}:generateContent", self.model_url());
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generateContent after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| PulsoError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, model = %self.model, "generateContent response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| PulsoError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| PulsoError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let error = classify_error(status, &body);

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            PulsoError::provider("generateContent request failed after retries")
        }))
    }

    /// Fetches the model's metadata. Any non-success status is an error.
    pub async fn get_model(&self) -> Result<(), PulsoError> {
        let response = self
            .client
            .get(self.model_url())
            .send()
            .await
            .map_err(|e| PulsoError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status, &body))
    }
}

/// Maps a failed response onto the error taxonomy.
fn classify_error(status: StatusCode, body: &str) -> PulsoError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(envelope) if status == StatusCode::TOO_MANY_REQUESTS || envelope.error.is_quota() => {
            PulsoError::QuotaExceeded(envelope.error.message)
        }
        Ok(envelope) => PulsoError::provider(format!(
            "Gemini API error ({} {}): {}",
            envelope.error.code, envelope.error.status, envelope.error.message
        )),
        Err(_) if status == StatusCode::TOO_MANY_REQUESTS => {
            PulsoError::QuotaExceeded(format!("API returned {status}: {body}"))
        }
        Err(_) => PulsoError::provider(format!("API returned {status}: {body}")),
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Content;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-api-key", base_url, "gemini-1.5-flash", None)
            .unwrap()
            .with_retry_delay(Duration::from_millis(10))
    }

    fn test_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user("Hola")],
            system_instruction: None,
            generation_config: None,
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 2},
            "modelVersion": "gemini-1.5-flash-002"
        })
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("¡Hola!")))
            .mount(&server)
            .await;

        let resp = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("¡Hola!"));
        assert_eq!(resp.model_version.as_deref(), Some("gemini-1.5-flash-002"));
    }

    #[tokio::test]
    async fn quota_exhaustion_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Resource has been exhausted (e.g. check quota).", "status": "RESOURCE_EXHAUSTED"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, PulsoError::QuotaExceeded(_)), "got: {err}");
        assert!(err.trips_breaker());
    }

    #[tokio::test]
    async fn retries_once_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("tras reintento")))
            .mount(&server)
            .await;

        let resp = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("tras reintento"));
    }

    #[tokio::test]
    async fn exhausted_retries_surface_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"code": 500, "message": "Internal error", "status": "INTERNAL"}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, PulsoError::Provider { .. }));
        assert!(err.to_string().contains("INTERNAL"), "got: {err}");
    }

    #[tokio::test]
    async fn bad_request_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&test_request())
            .await
            .unwrap_err();
        assert!(!err.is_quota());
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn get_model_checks_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/gemini-1.5-flash"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "models/gemini-1.5-flash"
            })))
            .mount(&server)
            .await;

        assert!(test_client(&server.uri()).get_model().await.is_ok());

        let other = GeminiClient::new("k", &server.uri(), "unknown-model", None).unwrap();
        assert!(other.get_model().await.is_err());
    }
}
