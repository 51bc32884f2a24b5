// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schedule operations.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use pulso_core::domain::{NewSchedule, Schedule};
use pulso_core::{PulsoError, ScheduleStore};

use crate::InMemoryStore;

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn list_schedules(&self, user_id: &str) -> Result<Vec<Schedule>, PulsoError> {
        self.check_read()?;
        let state = self.state.lock().await;
        Ok(state
            .schedules
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> Result<Schedule, PulsoError> {
        self.check_write()?;
        if schedule.day_of_week > 6 {
            return Err(PulsoError::storage(format!(
                "day_of_week out of range: {}",
                schedule.day_of_week
            )));
        }

        let record = Schedule {
            id: Self::new_id(),
            user_id: schedule.user_id,
            day_of_week: schedule.day_of_week,
            day_name: schedule.day_name,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            active: schedule.active,
            created_at: Utc::now(),
        };
        self.state.lock().await.schedules.push(record.clone());
        Ok(record)
    }

    async fn delete_schedules(&self, user_id: &str, days: &[u8]) -> Result<usize, PulsoError> {
        self.check_write()?;
        let mut state = self.state.lock().await;
        let before = state.schedules.len();
        state
            .schedules
            .retain(|s| !(s.user_id == user_id && days.contains(&s.day_of_week)));
        let removed = before - state.schedules.len();
        debug!(user_id = %user_id, ?days, removed, "schedules deleted");
        Ok(removed)
    }
}
