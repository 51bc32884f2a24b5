// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Work session operations. At most one session per user is active.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use pulso_core::domain::{WorkSession, WriteOutcome};
use pulso_core::{PulsoError, SessionStore};

use crate::InMemoryStore;

impl InMemoryStore {
    /// Inserts an already-finished session. Used for fixtures.
    pub async fn seed_completed_session(
        &self,
        user_id: &str,
        started_at: DateTime<Utc>,
        duration_minutes: u32,
    ) -> WorkSession {
        let session = WorkSession {
            id: Self::new_id(),
            user_id: user_id.to_string(),
            started_at,
            ended_at: Some(started_at + Duration::minutes(i64::from(duration_minutes))),
            active: false,
            duration_minutes: Some(duration_minutes),
            notes: None,
        };
        self.state.lock().await.sessions.push(session.clone());
        session
    }

    /// Ends the user's active session, recording its duration in whole minutes.
    pub async fn end_session(&self, user_id: &str) -> Result<Option<WorkSession>, PulsoError> {
        self.check_write()?;
        let mut state = self.state.lock().await;
        let Some(session) = state
            .sessions
            .iter_mut()
            .find(|s| s.user_id == user_id && s.active)
        else {
            return Ok(None);
        };

        let now = Utc::now();
        let minutes = (now - session.started_at).num_minutes().max(0);
        session.active = false;
        session.ended_at = Some(now);
        session.duration_minutes = Some(u32::try_from(minutes).unwrap_or(u32::MAX));
        info!(user_id = %user_id, session_id = %session.id, minutes, "work session ended");
        Ok(Some(session.clone()))
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn active_session(&self, user_id: &str) -> Result<Option<WorkSession>, PulsoError> {
        self.check_read()?;
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .iter()
            .find(|s| s.user_id == user_id && s.active)
            .cloned())
    }

    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkSession>, PulsoError> {
        self.check_read()?;
        let state = self.state.lock().await;
        let mut sessions: Vec<WorkSession> = state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions.truncate(limit);
        Ok(sessions)
    }

    async fn start_session(
        &self,
        user_id: &str,
        notes: Option<String>,
    ) -> Result<WriteOutcome<WorkSession>, PulsoError> {
        self.check_write()?;
        // Check and insert under one lock so two starts cannot both succeed.
        let mut state = self.state.lock().await;
        if state.sessions.iter().any(|s| s.user_id == user_id && s.active) {
            debug!(user_id = %user_id, "start refused: session already active");
            return Ok(WriteOutcome::refused(
                "Ya tienes una sesión de trabajo activa",
            ));
        }

        let session = WorkSession {
            id: Self::new_id(),
            user_id: user_id.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            active: true,
            duration_minutes: None,
            notes: notes.filter(|n| !n.trim().is_empty()),
        };
        state.sessions.push(session.clone());
        info!(user_id = %user_id, session_id = %session.id, "work session started");
        Ok(WriteOutcome::created(session).with_message("Sesión de trabajo iniciada"))
    }
}
