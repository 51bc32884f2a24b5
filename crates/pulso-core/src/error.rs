// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Pulso assistant.

use thiserror::Error;

/// The primary error type used across all Pulso adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PulsoError {
    /// Configuration errors (invalid TOML, missing credentials, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller-supplied user identity is not a valid UUID.
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    /// Generative-AI provider errors (network failure, non-success HTTP status).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider reported an exhausted quota or rate ceiling.
    #[error("provider quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The provider answered, but the answer could not be interpreted.
    #[error("malformed provider output: {0}")]
    MalformedOutput(String),

    /// Collaborator store errors (read or write failure).
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PulsoError {
    /// Shorthand for a storage error without an underlying source.
    pub fn storage(message: impl Into<String>) -> Self {
        PulsoError::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        PulsoError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error must disable the AI path for the rest of the session.
    ///
    /// Call failures and quota exhaustion trip the switch. A call that
    /// succeeded but produced unusable text does not.
    pub fn trips_breaker(&self) -> bool {
        matches!(
            self,
            PulsoError::Provider { .. } | PulsoError::QuotaExceeded(_)
        )
    }

    /// Whether the error text points at quota exhaustion.
    pub fn is_quota(&self) -> bool {
        matches!(self, PulsoError::QuotaExceeded(_))
            || self.to_string().to_lowercase().contains("quota")
    }
}
