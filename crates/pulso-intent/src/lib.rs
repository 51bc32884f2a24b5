// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic message analysis for the Pulso assistant.
//!
//! This crate provides:
//! - [`RuleEngine`]: keyword classifier over the closed [`Intent`](pulso_core::Intent) set
//! - [`extract_routine_entities`]: routine title/description extraction
//! - [`extract_schedule`]: time range and day-set extraction for schedule phrases
//!
//! Every extractor is an ordered list of named rules evaluated top-down.
//! Nothing here performs I/O, and every function is total.

pub mod days;
pub mod entities;
pub mod rules;
pub mod schedule;

pub use days::{day_name, join_day_names, DEFAULT_DELETE_DAYS, WEEKDAYS};
pub use entities::{extract_routine_entities, RoutineEntities};
pub use rules::{RuleEngine, TRIVIAL_REPLIES};
pub use schedule::{extract_days, extract_schedule, extract_time_range, ScheduleEntities};
