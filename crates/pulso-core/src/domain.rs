// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracker records owned by the backend collaborators, and the per-turn
//! [`UserContext`] snapshot derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to a routine when none could be extracted.
pub const DEFAULT_ROUTINE_TITLE: &str = "Nueva Rutina";

/// A recurring routine tracked for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub active: bool,
    pub completed_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoutine {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A working-hours block for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub user_id: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    pub day_name: String,
    /// `HH:MM:SS`, 24-hour clock.
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting one schedule row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub user_id: String,
    pub day_of_week: u8,
    pub day_name: String,
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
}

/// A tracked block of focused work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
}

impl WorkSession {
    /// A session counts as completed once it has ended with a recorded duration.
    pub fn is_completed(&self) -> bool {
        !self.active && self.ended_at.is_some() && self.duration_minutes.is_some()
    }
}

/// Result of a collaborator write that may be refused without erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOutcome<T> {
    pub success: bool,
    pub record: Option<T>,
    pub message: Option<String>,
}

impl<T> WriteOutcome<T> {
    pub fn created(record: T) -> Self {
        Self {
            success: true,
            record: Some(record),
            message: None,
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            record: None,
            message: Some(message.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Summary statistics over a user's routines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Routine with the highest completion counter.
    pub most_used: Option<Routine>,
    pub average_completions: f64,
}

/// Summary statistics over a user's schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

/// Summary statistics over a user's recent work sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub completed: usize,
    pub total_minutes: u64,
    pub average_minutes: f64,
    pub last_completed: Option<WorkSession>,
}

/// Read-only snapshot of a user's tracker data, rebuilt for every message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub routines: Vec<Routine>,
    pub schedules: Vec<Schedule>,
    pub active_session: Option<WorkSession>,
    pub recent_sessions: Vec<WorkSession>,
    pub routines_stats: Option<RoutineStats>,
    pub schedules_stats: Option<ScheduleStats>,
    pub sessions_stats: Option<SessionStats>,
    pub has_data: bool,
}

impl UserContext {
    /// Whether a work session is currently running.
    pub fn has_active_session(&self) -> bool {
        self.active_session.is_some()
    }

    /// Finds a routine whose title matches `name` as a case-insensitive
    /// substring in either direction.
    pub fn find_routine(&self, name: &str) -> Option<&Routine> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.routines.iter().find(|r| {
            let title = r.title.trim().to_lowercase();
            !title.is_empty() && (title.contains(&needle) || needle.contains(&title))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine(title: &str) -> Routine {
        Routine {
            id: format!("id-{title}"),
            user_id: "u".into(),
            title: title.into(),
            description: String::new(),
            active: true,
            completed_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn find_routine_matches_both_directions() {
        let ctx = UserContext {
            routines: vec![routine("Correr"), routine("Leer libros")],
            ..UserContext::default()
        };
        assert_eq!(ctx.find_routine("correr").unwrap().id, "id-Correr");
        assert_eq!(ctx.find_routine("leer").unwrap().id, "id-Leer libros");
        assert_eq!(
            ctx.find_routine("iniciar rutina correr ahora").unwrap().id,
            "id-Correr"
        );
        assert!(ctx.find_routine("nadar").is_none());
        assert!(ctx.find_routine("   ").is_none());
    }

    #[test]
    fn completed_session_requires_end_and_duration() {
        let mut s = WorkSession {
            id: "s".into(),
            user_id: "u".into(),
            started_at: Utc::now(),
            ended_at: None,
            active: true,
            duration_minutes: None,
            notes: None,
        };
        assert!(!s.is_completed());
        s.active = false;
        s.ended_at = Some(Utc::now());
        s.duration_minutes = Some(25);
        assert!(s.is_completed());
    }
}
