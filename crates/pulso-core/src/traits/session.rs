// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Work-session persistence collaborator.

use async_trait::async_trait;

use crate::domain::{WorkSession, WriteOutcome};
use crate::error::PulsoError;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the user's running session, if any.
    async fn active_session(&self, user_id: &str) -> Result<Option<WorkSession>, PulsoError>;

    /// Lists the user's sessions, newest first, up to `limit`.
    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkSession>, PulsoError>;

    /// Starts a session.
    ///
    /// Implementations must refuse (`success = false`) when the user already
    /// has an active session: at most one active session per user.
    async fn start_session(
        &self,
        user_id: &str,
        notes: Option<String>,
    ) -> Result<WriteOutcome<WorkSession>, PulsoError>;
}
