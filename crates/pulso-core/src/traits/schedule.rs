// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schedule persistence collaborator.

use async_trait::async_trait;

use crate::domain::{NewSchedule, Schedule};
use crate::error::PulsoError;

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Lists the user's schedules, newest first.
    async fn list_schedules(&self, user_id: &str) -> Result<Vec<Schedule>, PulsoError>;

    /// Inserts a single schedule row.
    async fn insert_schedule(&self, schedule: NewSchedule) -> Result<Schedule, PulsoError>;

    /// Deletes the user's rows whose `day_of_week` is in `days`.
    /// Returns the number of rows removed.
    async fn delete_schedules(&self, user_id: &str, days: &[u8]) -> Result<usize, PulsoError>;
}
