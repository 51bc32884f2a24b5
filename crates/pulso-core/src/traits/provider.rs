// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for generative-AI text completion (Gemini, mocks).

use async_trait::async_trait;

use crate::error::PulsoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{HealthStatus, ProviderRequest, ProviderResponse};

/// Adapter for a black-box text completion service.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    ///
    /// Quota exhaustion must be reported as [`PulsoError::QuotaExceeded`].
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, PulsoError>;

    /// Connectivity check. Any health check error counts as unreachable.
    async fn verify(&self) -> bool {
        matches!(self.health_check().await, Ok(HealthStatus::Healthy))
    }
}
