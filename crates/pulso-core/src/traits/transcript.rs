// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transcript persistence collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PulsoError;
use crate::types::{ConversationTurn, Role};

/// Per-chat-session aggregate over stored turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub session_id: String,
    pub turn_count: usize,
    pub user_turns: usize,
    pub assistant_turns: usize,
    /// Sum of `tokens_used` recorded in assistant turn metadata.
    pub tokens_used: u64,
    pub first_at: DateTime<Utc>,
    pub last_at: DateTime<Utc>,
}

#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Appends a turn and returns its id.
    async fn append_turn(
        &self,
        user_id: &str,
        session_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<String, PulsoError>;

    /// Lists the most recent `limit` turns in chronological order, optionally
    /// restricted to one chat session.
    async fn list_turns(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, PulsoError>;

    /// Groups the user's turns by chat session, most recently active first.
    async fn session_summaries(&self, user_id: &str)
        -> Result<Vec<ChatSessionSummary>, PulsoError>;
}
