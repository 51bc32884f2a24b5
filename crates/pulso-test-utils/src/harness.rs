// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles an [`Orchestrator`] over a fresh
//! [`InMemoryStore`] and, optionally, a [`MockProvider`]. Provides
//! `send_message()` to drive the full pipeline in tests.

use std::sync::Arc;

use pulso_agent::{Orchestrator, Stores};
use pulso_config::model::PulsoConfig;
use pulso_core::{AssistantReply, ProviderAdapter, PulsoError};
use pulso_store::InMemoryStore;

use crate::mock_provider::MockProvider;

/// Valid v4 UUID used as the default test user.
pub const TEST_USER_ID: &str = "3f2b8c1e-9d4a-4b6e-8f1a-2c3d4e5f6a7b";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: PulsoConfig,
    provider: Option<MockProvider>,
    user_id: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: PulsoConfig::default(),
            provider: None,
            user_id: TEST_USER_ID.to_string(),
        }
    }

    /// Attach a mock provider pre-loaded with text replies.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.provider = Some(MockProvider::with_responses(responses));
        self
    }

    /// Attach a configured mock provider.
    pub fn with_provider(mut self, provider: MockProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_confirm_destructive(mut self, confirm: bool) -> Self {
        self.config.agent.confirm_destructive = confirm;
        self
    }

    pub fn with_config(mut self, config: PulsoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Build the harness. Without a provider the orchestrator runs on rules.
    pub fn build(self) -> TestHarness {
        let store = Arc::new(InMemoryStore::new());
        let provider = self.provider.map(Arc::new);
        let orchestrator = Orchestrator::new(
            &self.config,
            Stores::shared(store.clone()),
            provider
                .clone()
                .map(|p| p as Arc<dyn ProviderAdapter>),
        );

        TestHarness {
            orchestrator,
            store,
            provider,
            user_id: self.user_id,
        }
    }
}

/// A fully wired pipeline for one test user.
pub struct TestHarness {
    pub orchestrator: Orchestrator,
    pub store: Arc<InMemoryStore>,
    pub provider: Option<Arc<MockProvider>>,
    pub user_id: String,
}

impl TestHarness {
    /// Create a new test harness builder.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Sends `text` as the harness user.
    pub async fn send_message(&self, text: &str) -> Result<AssistantReply, PulsoError> {
        self.orchestrator.process_message(text, &self.user_id).await
    }

    /// The mock provider. Panics when the harness was built without one.
    pub fn provider(&self) -> &MockProvider {
        self.provider
            .as_deref()
            .expect("harness was built without a mock provider")
    }

    /// Queue an additional provider reply.
    pub async fn add_provider_response(&self, text: impl Into<String>) {
        self.provider().add_response(text).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_without_provider_uses_rules() {
        let harness = TestHarness::builder().build();
        assert!(!harness.orchestrator.ai_enabled());
        let reply = harness.send_message("ayuda").await.unwrap();
        assert_eq!(reply.intent, pulso_core::Intent::Help);
    }

    #[tokio::test]
    async fn harness_with_provider_starts_in_ai_mode() {
        let harness = TestHarness::builder()
            .with_mock_responses(vec![r#"{"intent": "general", "confidence": 0.8}"#.into()])
            .build();
        assert!(harness.orchestrator.ai_enabled());
        harness.add_provider_response("¡Hola!").await;

        let reply = harness.send_message("buenos días").await.unwrap();
        assert_eq!(reply.message, "¡Hola!");
        assert_eq!(harness.provider().call_count(), 2);
    }
}
