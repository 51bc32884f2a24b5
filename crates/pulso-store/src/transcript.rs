// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transcript operations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use pulso_core::traits::ChatSessionSummary;
use pulso_core::types::{ConversationTurn, Role};
use pulso_core::{PulsoError, TranscriptStore};

use crate::InMemoryStore;

fn recorded_tokens(turn: &ConversationTurn) -> u64 {
    turn.metadata
        .as_ref()
        .and_then(|m| m.get("tokens_used"))
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0)
}

#[async_trait]
impl TranscriptStore for InMemoryStore {
    async fn append_turn(
        &self,
        user_id: &str,
        session_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<String, PulsoError> {
        self.check_write()?;
        let turn = ConversationTurn {
            id: Self::new_id(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            metadata,
            created_at: Utc::now(),
        };
        let id = turn.id.clone();
        self.state.lock().await.turns.push(turn);
        Ok(id)
    }

    async fn list_turns(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, PulsoError> {
        self.check_read()?;
        let state = self.state.lock().await;
        let mut turns: Vec<ConversationTurn> = state
            .turns
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .filter(|t| session_id.is_none_or(|sid| t.session_id == sid))
            .take(limit)
            .cloned()
            .collect();
        turns.reverse();
        Ok(turns)
    }

    async fn session_summaries(
        &self,
        user_id: &str,
    ) -> Result<Vec<ChatSessionSummary>, PulsoError> {
        self.check_read()?;
        let state = self.state.lock().await;
        let mut by_session: HashMap<&str, ChatSessionSummary> = HashMap::new();

        for turn in state.turns.iter().filter(|t| t.user_id == user_id) {
            let summary = by_session
                .entry(turn.session_id.as_str())
                .or_insert_with(|| ChatSessionSummary {
                    session_id: turn.session_id.clone(),
                    turn_count: 0,
                    user_turns: 0,
                    assistant_turns: 0,
                    tokens_used: 0,
                    first_at: turn.created_at,
                    last_at: turn.created_at,
                });
            summary.turn_count += 1;
            match turn.role {
                Role::User => summary.user_turns += 1,
                Role::Assistant => {
                    summary.assistant_turns += 1;
                    summary.tokens_used += recorded_tokens(turn);
                }
            }
            summary.first_at = summary.first_at.min(turn.created_at);
            summary.last_at = summary.last_at.max(turn.created_at);
        }

        let mut summaries: Vec<ChatSessionSummary> = by_session.into_values().collect();
        summaries.sort_by(|a, b| b.last_at.cmp(&a.last_at));
        Ok(summaries)
    }
}
