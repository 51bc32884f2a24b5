// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use pulso_core::traits::{PluginAdapter, ProviderAdapter};
use pulso_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use pulso_core::PulsoError;

/// One queued outcome of a `complete` call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Text(String),
    /// Fails with a provider (call) error.
    Failure(String),
    /// Fails with a quota error.
    Quota(String),
}

/// A mock provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. Every request is recorded.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    calls: AtomicUsize,
    reachable: AtomicBool,
    failing: AtomicBool,
    quota_exhausted: AtomicBool,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    /// Create a mock provider pre-loaded with the given text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Text).collect())
    }

    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            reachable: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            quota_exhausted: AtomicBool::new(false),
        }
    }

    /// Add a text reply to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .await
            .push_back(MockReply::Text(text.into()));
    }

    pub async fn add_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Controls the outcome of health checks.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Makes every completion fail with a provider error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every completion fail with a quota error.
    pub fn set_quota_exhausted(&self, exhausted: bool) {
        self.quota_exhausted.store(exhausted, Ordering::SeqCst);
    }

    /// Number of `complete` calls received. Health checks are not counted.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, PulsoError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("mock provider unreachable".into()))
        }
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, PulsoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);

        if self.quota_exhausted.load(Ordering::SeqCst) {
            return Err(PulsoError::QuotaExceeded("mock quota exhausted".into()));
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PulsoError::provider("mock provider failure"));
        }

        match self.next_reply().await {
            MockReply::Text(text) => Ok(ProviderResponse {
                text,
                model: "mock-model".to_string(),
                usage: Some(TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                }),
            }),
            MockReply::Failure(message) => Err(PulsoError::provider(message)),
            MockReply::Quota(message) => Err(PulsoError::QuotaExceeded(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(ProviderRequest::new("hola")).await.unwrap();
        assert_eq!(resp.text, "mock response");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let provider = MockProvider::with_replies(vec![
            MockReply::Text("first".into()),
            MockReply::Quota("limit".into()),
        ]);
        provider.add_response("third").await;

        let first = provider.complete(ProviderRequest::new("a")).await.unwrap();
        assert_eq!(first.text, "first");
        let err = provider.complete(ProviderRequest::new("b")).await.unwrap_err();
        assert!(err.is_quota());
        let third = provider.complete(ProviderRequest::new("c")).await.unwrap();
        assert_eq!(third.text, "third");

        let prompts: Vec<String> = provider
            .requests()
            .await
            .into_iter()
            .map(|r| r.prompt)
            .collect();
        assert_eq!(prompts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn switches_override_the_queue() {
        let provider = MockProvider::with_responses(vec!["unused".into()]);
        provider.set_failing(true);
        let err = provider.complete(ProviderRequest::new("x")).await.unwrap_err();
        assert!(err.trips_breaker());
        assert!(!err.is_quota());

        provider.set_reachable(false);
        assert!(!provider.verify().await);
        provider.set_reachable(true);
        assert!(provider.verify().await);
    }
}
