// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pulso classify` - show how the deterministic rules read a message.

use pulso_core::Intent;
use pulso_intent::{extract_routine_entities, extract_schedule, RuleEngine, RoutineEntities, ScheduleEntities};
use serde::Serialize;

/// What the rules see in one message.
#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub message: String,
    pub intent: Intent,
    /// Name of the rule that decided the intent.
    pub rule: &'static str,
    pub routine: RoutineEntities,
    pub schedule: ScheduleEntities,
}

pub fn classify_report(message: &str) -> ClassifyReport {
    let matched = RuleEngine::new().explain(message);
    ClassifyReport {
        message: message.to_string(),
        intent: matched.intent,
        rule: matched.rule,
        routine: extract_routine_entities(message),
        schedule: extract_schedule(message),
    }
}
