// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summary statistics derived from the raw tracker collections.

use pulso_core::domain::{
    Routine, RoutineStats, Schedule, ScheduleStats, SessionStats, WorkSession,
};

/// Counts routines by state and finds the most-completed one.
///
/// Ties on the completion counter keep the routine listed first.
pub fn routine_stats(routines: &[Routine]) -> RoutineStats {
    let total = routines.len();
    let active = routines.iter().filter(|r| r.active).count();
    let most_used = routines.iter().fold(None::<&Routine>, |best, r| match best {
        Some(b) if b.completed_count >= r.completed_count => Some(b),
        _ => Some(r),
    });
    let completions: u64 = routines.iter().map(|r| u64::from(r.completed_count)).sum();

    RoutineStats {
        total,
        active,
        inactive: total - active,
        most_used: most_used.cloned(),
        average_completions: mean(completions, total),
    }
}

pub fn schedule_stats(schedules: &[Schedule]) -> ScheduleStats {
    let total = schedules.len();
    let active = schedules.iter().filter(|s| s.active).count();
    ScheduleStats {
        total,
        active,
        inactive: total - active,
    }
}

/// Aggregates durations over completed sessions only; running or
/// abandoned sessions are ignored.
pub fn session_stats(sessions: &[WorkSession]) -> SessionStats {
    let completed: Vec<&WorkSession> = sessions.iter().filter(|s| s.is_completed()).collect();
    let total_minutes: u64 = completed
        .iter()
        .filter_map(|s| s.duration_minutes)
        .map(u64::from)
        .sum();
    let last_completed = completed
        .iter()
        .max_by_key(|s| s.ended_at)
        .map(|s| (*s).clone());

    SessionStats {
        completed: completed.len(),
        total_minutes,
        average_minutes: mean(total_minutes, completed.len()),
        last_completed,
    }
}

fn mean(sum: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
