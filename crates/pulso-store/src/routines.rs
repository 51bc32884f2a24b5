// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routine operations.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use pulso_core::domain::{NewRoutine, Routine, WriteOutcome};
use pulso_core::{PulsoError, RoutineStore};

use crate::InMemoryStore;

impl InMemoryStore {
    /// Inserts a routine directly, bypassing validation. Used for fixtures.
    pub async fn seed_routine(
        &self,
        user_id: &str,
        title: &str,
        active: bool,
        completed_count: u32,
    ) -> Routine {
        let routine = Routine {
            id: Self::new_id(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            active,
            completed_count,
            created_at: Utc::now(),
        };
        self.state.lock().await.routines.push(routine.clone());
        routine
    }
}

#[async_trait]
impl RoutineStore for InMemoryStore {
    async fn list_routines(&self, user_id: &str) -> Result<Vec<Routine>, PulsoError> {
        self.check_read()?;
        let state = self.state.lock().await;
        Ok(state
            .routines
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_routine(
        &self,
        user_id: &str,
        routine: NewRoutine,
    ) -> Result<WriteOutcome<Routine>, PulsoError> {
        self.check_write()?;
        let title = routine.title.trim();
        if title.is_empty() {
            return Ok(WriteOutcome::refused("El título de la rutina es obligatorio"));
        }

        let record = Routine {
            id: Self::new_id(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: routine.description.trim().to_string(),
            active: true,
            completed_count: 0,
            created_at: Utc::now(),
        };
        self.state.lock().await.routines.push(record.clone());
        debug!(user_id = %user_id, routine_id = %record.id, "routine created");
        Ok(WriteOutcome::created(record).with_message("Rutina creada correctamente"))
    }
}
