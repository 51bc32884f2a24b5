// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn [`UserContext`] assembly.

use std::sync::Arc;

use pulso_config::model::ContextConfig;
use pulso_core::domain::UserContext;
use pulso_core::{PulsoError, RoutineStore, ScheduleStore, SessionStore};
use tracing::{debug, warn};

use crate::stats::{routine_stats, schedule_stats, session_stats};

/// Reads the user's tracker data and derives statistics from it.
///
/// The four reads run concurrently and are all awaited. A failed read is
/// logged and degrades to an empty collection with no statistics; `build`
/// itself never fails.
#[derive(Clone)]
pub struct ContextAggregator {
    routines: Arc<dyn RoutineStore>,
    schedules: Arc<dyn ScheduleStore>,
    sessions: Arc<dyn SessionStore>,
    recent_sessions_limit: usize,
}

impl ContextAggregator {
    pub fn new(
        routines: Arc<dyn RoutineStore>,
        schedules: Arc<dyn ScheduleStore>,
        sessions: Arc<dyn SessionStore>,
        config: &ContextConfig,
    ) -> Self {
        Self {
            routines,
            schedules,
            sessions,
            recent_sessions_limit: config.recent_sessions_limit,
        }
    }

    /// Builds a fresh snapshot for `user_id`. Never cached.
    pub async fn build(&self, user_id: &str) -> UserContext {
        let (routines, schedules, active, recent) = tokio::join!(
            self.routines.list_routines(user_id),
            self.schedules.list_schedules(user_id),
            self.sessions.active_session(user_id),
            self.sessions
                .recent_sessions(user_id, self.recent_sessions_limit),
        );

        let routines = degrade(user_id, "routines", routines);
        let schedules = degrade(user_id, "schedules", schedules);
        let active_session = degrade(user_id, "active_session", active).flatten();
        let recent_sessions = degrade(user_id, "recent_sessions", recent);

        let has_data = routines.as_ref().is_some_and(|r| !r.is_empty())
            || schedules.as_ref().is_some_and(|s| !s.is_empty())
            || recent_sessions.as_ref().is_some_and(|s| !s.is_empty());

        let context = UserContext {
            routines_stats: routines.as_deref().map(routine_stats),
            schedules_stats: schedules.as_deref().map(schedule_stats),
            sessions_stats: recent_sessions.as_deref().map(session_stats),
            routines: routines.unwrap_or_default(),
            schedules: schedules.unwrap_or_default(),
            active_session,
            recent_sessions: recent_sessions.unwrap_or_default(),
            has_data,
        };

        debug!(
            user_id = %user_id,
            routines = context.routines.len(),
            schedules = context.schedules.len(),
            recent_sessions = context.recent_sessions.len(),
            active_session = context.has_active_session(),
            has_data,
            "user context built"
        );
        context
    }
}

fn degrade<T>(user_id: &str, read: &'static str, result: Result<T, PulsoError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(user_id = %user_id, read, error = %e, "context read failed, using empty data");
            None
        }
    }
}
