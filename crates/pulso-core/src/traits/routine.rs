// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routine persistence collaborator.

use async_trait::async_trait;

use crate::domain::{NewRoutine, Routine, WriteOutcome};
use crate::error::PulsoError;

#[async_trait]
pub trait RoutineStore: Send + Sync {
    /// Lists the user's routines, newest first.
    async fn list_routines(&self, user_id: &str) -> Result<Vec<Routine>, PulsoError>;

    /// Creates a routine. A refused write is an `Ok` outcome with `success = false`.
    async fn create_routine(
        &self,
        user_id: &str,
        routine: NewRoutine,
    ) -> Result<WriteOutcome<Routine>, PulsoError>;
}
