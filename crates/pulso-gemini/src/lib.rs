// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for the Pulso assistant.
//!
//! Implements [`ProviderAdapter`] over the `generateContent` endpoint as a
//! single-shot text completion. Quota exhaustion surfaces as
//! [`PulsoError::QuotaExceeded`] so callers can trip their AI switch.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use pulso_config::model::GeminiConfig;
use pulso_core::error::PulsoError;
use pulso_core::traits::{PluginAdapter, ProviderAdapter};
use pulso_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

/// Environment variable consulted when `gemini.api_key` is unset.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiProvider {
    client: GeminiClient,
    max_output_tokens: u32,
    temperature: f32,
}

impl GeminiProvider {
    /// Creates a provider from the `[gemini]` config section.
    pub fn new(config: &GeminiConfig) -> Result<Self, PulsoError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let timeout = config.timeout_secs.map(Duration::from_secs);
        let client = GeminiClient::new(&api_key, &config.base_url, &config.model, timeout)?;
        info!(model = %config.model, "Gemini provider initialized");
        Ok(Self::with_client(client, config))
    }

    fn with_client(client: GeminiClient, config: &GeminiConfig) -> Self {
        Self {
            client,
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
        }
    }

    fn to_api_request(&self, request: &ProviderRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(request.prompt.clone())],
            system_instruction: request
                .system_prompt
                .as_ref()
                .filter(|s| !s.trim().is_empty())
                .map(|s| Content::system(s.clone())),
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(request.max_output_tokens.unwrap_or(self.max_output_tokens)),
                temperature: Some(request.temperature.unwrap_or(self.temperature)),
            }),
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    /// Checks the model endpoint; does not consume generation quota.
    async fn health_check(&self) -> Result<HealthStatus, PulsoError> {
        match self.client.get_model().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, PulsoError> {
        let api_request = self.to_api_request(&request);
        let response = self.client.generate_content(&api_request).await?;

        let text = response.first_text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".into());
            PulsoError::MalformedOutput(format!("response carried no text ({reason})"))
        })?;

        debug!(chars = text.len(), "Gemini completion received");
        Ok(ProviderResponse {
            text,
            model: response
                .model_version
                .unwrap_or_else(|| self.client.model().to_string()),
            usage: response.usage_metadata.map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            }),
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, PulsoError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            PulsoError::Config(format!(
                "Gemini API key not found. Set gemini.api_key in config or {API_KEY_ENV} environment variable."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> GeminiProvider {
        let config = GeminiConfig {
            api_key: Some("test-key".into()),
            base_url: base_url.to_string(),
            ..GeminiConfig::default()
        };
        GeminiProvider::new(&config).unwrap()
    }

    #[test]
    fn resolve_api_key_from_config() {
        assert_eq!(resolve_api_key(&Some("k-123".into())).unwrap(), "k-123");
    }

    #[test]
    fn resolve_api_key_none_falls_back_to_env() {
        // Succeeds only if the variable is set in the environment running the tests.
        if let Err(err) = resolve_api_key(&None) {
            assert!(err.to_string().contains("API key not found"), "got: {err}");
        }
    }

    #[test]
    fn request_defaults_come_from_config() {
        let p = provider("http://localhost");
        let api = p.to_api_request(&ProviderRequest::new("hola").with_system_prompt("sé breve"));
        let generation = api.generation_config.unwrap();
        assert_eq!(generation.max_output_tokens, Some(1024));
        assert_eq!(api.system_instruction.unwrap().text(), "sé breve");

        let api = p.to_api_request(&ProviderRequest {
            max_output_tokens: Some(50),
            ..ProviderRequest::new("hola")
        });
        assert_eq!(api.generation_config.unwrap().max_output_tokens, Some(50));
        assert!(api.system_instruction.is_none());
    }

    #[tokio::test]
    async fn complete_maps_text_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hola"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "¡Hola!"}]}}],
                "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2}
            })))
            .mount(&server)
            .await;

        let resp = provider(&server.uri())
            .complete(ProviderRequest::new("hola"))
            .await
            .unwrap();
        assert_eq!(resp.text, "¡Hola!");
        assert_eq!(resp.model, "gemini-1.5-flash");
        assert_eq!(resp.usage.unwrap().output_tokens, 2);
    }

    #[tokio::test]
    async fn empty_candidates_are_malformed_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .complete(ProviderRequest::new("hola"))
            .await
            .unwrap_err();
        assert!(matches!(err, PulsoError::MalformedOutput(ref m) if m.contains("SAFETY")));
        assert!(!err.trips_breaker());
    }

    #[tokio::test]
    async fn verify_reflects_model_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models/gemini-1.5-flash"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        assert!(provider(&server.uri()).verify().await);

        let down = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&down)
            .await;
        assert!(!provider(&down.uri()).verify().await);
    }

    #[tokio::test]
    async fn configured_timeout_bounds_slow_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "candidates": [{"content": {"parts": [{"text": "tarde"}]}}]
                    }))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = GeminiConfig {
            api_key: Some("test-key".into()),
            base_url: server.uri(),
            timeout_secs: Some(1),
            ..GeminiConfig::default()
        };
        let err = GeminiProvider::new(&config)
            .unwrap()
            .complete(ProviderRequest::new("hola"))
            .await
            .unwrap_err();
        assert!(matches!(err, PulsoError::Provider { .. }), "got: {err:?}");
        assert!(err.trips_breaker());
    }
}
