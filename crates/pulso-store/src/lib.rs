// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementations of the Pulso collaborator stores.
//!
//! [`InMemoryStore`] implements [`RoutineStore`](pulso_core::RoutineStore),
//! [`ScheduleStore`](pulso_core::ScheduleStore),
//! [`SessionStore`](pulso_core::SessionStore) and
//! [`TranscriptStore`](pulso_core::TranscriptStore) over a single
//! mutex-guarded state. It backs the interactive shell and the test harness;
//! nothing is persisted across process restarts.
//!
//! Reads and writes can be made to fail on demand to exercise the
//! degraded paths of the pipeline.

mod routines;
mod schedules;
mod sessions;
mod transcript;

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pulso_core::domain::{Routine, Schedule, WorkSession};
use pulso_core::types::{AdapterType, ConversationTurn, HealthStatus};
use pulso_core::{PluginAdapter, PulsoError};

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) routines: Vec<Routine>,
    pub(crate) schedules: Vec<Schedule>,
    pub(crate) sessions: Vec<WorkSession>,
    pub(crate) turns: Vec<ConversationTurn>,
}

/// Process-local store for every tracker collaborator.
///
/// Records are kept in insertion order; "newest first" listings walk the
/// vectors backwards.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail with a storage error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn check_read(&self) -> Result<(), PulsoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PulsoError::storage("simulated read failure"));
        }
        Ok(())
    }

    pub(crate) fn check_write(&self) -> Result<(), PulsoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PulsoError::storage("simulated write failure"));
        }
        Ok(())
    }

    pub(crate) fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl PluginAdapter for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, PulsoError> {
        if self.fail_reads.load(Ordering::SeqCst) || self.fail_writes.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("failure injection active".into()));
        }
        Ok(HealthStatus::Healthy)
    }
}
