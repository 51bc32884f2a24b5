// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword intent classification.
//!
//! Maps a raw message onto the closed intent set with an ordered list of
//! keyword rules. First match wins. No network, no state, no failure mode.

use std::sync::LazyLock;

use pulso_core::Intent;
use regex::Regex;
use tracing::trace;

/// Confirmation-sized replies that must never be read as a command.
pub const TRIVIAL_REPLIES: &[&str] = &["si", "sí", "no", "ok", "okay"];

/// Messages shorter than this many characters are always trivial.
const MIN_COMMAND_CHARS: usize = 3;

/// Matches any of the given stems at the start of a word, so plural and
/// conjugated forms (`nuevas`, `crearme`, `iniciaré`) match as well.
fn keyword_stems(pattern: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{pattern})")).unwrap()
}

static CREATE_VERB: LazyLock<Regex> = LazyLock::new(|| {
    keyword_stems(r"cre[aá]|cré[ae]|creé|nuev|agreg|a[ñn][aá]d|pon")
});
static ROUTINE_NOUN: LazyLock<Regex> = LazyLock::new(|| keyword_stems("rutin|tarea"));
static START_VERB: LazyLock<Regex> =
    LazyLock::new(|| keyword_stems(r"in[ií]ci|empez|empiez|empec|comenz|comienz|comenc"));
static SCHEDULE_NOUN: LazyLock<Regex> = LazyLock::new(|| keyword_stems("horari"));
static DELETE_VERB: LazyLock<Regex> = LazyLock::new(|| keyword_stems(r"elim[ií]n|b[oó]rr|qu[ií]t"));
static WORK_NOUN: LazyLock<Regex> =
    LazyLock::new(|| keyword_stems(r"jornada|trabaj|sesi[oó]n"));
static INFO_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:última|ultima|último|ultimo|reciente|cuánt|cuant|cuál|\bcual\b|qué|\bque tengo\b|estadístic|estadistic|\bresumen\b)",
    )
    .unwrap()
});
static HELP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bayuda\b|\bqué puedo\b|\bque puedo\b|\bcómo\b|\bcomo funciona\b|\bcomandos\b)")
        .unwrap()
});

/// A named classification rule.
struct IntentRule {
    name: &'static str,
    intent: Intent,
    matches: fn(&str) -> bool,
}

fn is_trivial(message: &str) -> bool {
    let stripped = message.trim_matches(|c: char| c.is_ascii_punctuation() || "¡¿".contains(c));
    let lower = stripped.trim().to_lowercase();
    lower.chars().count() < MIN_COMMAND_CHARS || TRIVIAL_REPLIES.contains(&lower.as_str())
}

fn is_create_routine(m: &str) -> bool {
    CREATE_VERB.is_match(m) && ROUTINE_NOUN.is_match(m)
}

fn is_start_routine(m: &str) -> bool {
    START_VERB.is_match(m) && ROUTINE_NOUN.is_match(m)
}

fn is_create_schedule(m: &str) -> bool {
    CREATE_VERB.is_match(m) && SCHEDULE_NOUN.is_match(m)
}

fn is_delete_schedules(m: &str) -> bool {
    DELETE_VERB.is_match(m) && SCHEDULE_NOUN.is_match(m)
}

fn is_start_work_session(m: &str) -> bool {
    START_VERB.is_match(m) && WORK_NOUN.is_match(m)
}

fn is_info(m: &str) -> bool {
    INFO_MARKER.is_match(m)
}

fn is_help(m: &str) -> bool {
    HELP_MARKER.is_match(m)
}

/// Evaluation order is the priority order.
const RULES: &[IntentRule] = &[
    IntentRule { name: "trivial_reply", intent: Intent::General, matches: is_trivial },
    IntentRule { name: "create_routine", intent: Intent::CreateRoutine, matches: is_create_routine },
    IntentRule { name: "start_routine", intent: Intent::StartRoutine, matches: is_start_routine },
    IntentRule { name: "create_schedule", intent: Intent::CreateSchedule, matches: is_create_schedule },
    IntentRule { name: "delete_schedules", intent: Intent::DeleteSchedules, matches: is_delete_schedules },
    IntentRule { name: "start_work_session", intent: Intent::StartWorkSession, matches: is_start_work_session },
    IntentRule { name: "info_query", intent: Intent::GetInfo, matches: is_info },
    IntentRule { name: "help_request", intent: Intent::Help, matches: is_help },
];

/// Result of running the rule list over a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub intent: Intent,
    /// Name of the rule that fired, or `"fallback"` when none did.
    pub rule: &'static str,
}

/// Deterministic keyword classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classifies `message` into exactly one intent.
    pub fn classify(&self, message: &str) -> Intent {
        self.explain(message).intent
    }

    /// Classifies `message` and reports which rule decided it.
    pub fn explain(&self, message: &str) -> RuleMatch {
        let trimmed = message.trim();
        let matched = RULES
            .iter()
            .find(|rule| (rule.matches)(trimmed))
            .map(|rule| RuleMatch {
                intent: rule.intent,
                rule: rule.name,
            })
            .unwrap_or(RuleMatch {
                intent: Intent::General,
                rule: "fallback",
            });
        trace!(rule = matched.rule, intent = %matched.intent, "intent rule matched");
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(m: &str) -> Intent {
        RuleEngine::new().classify(m)
    }

    #[test]
    fn trivial_replies_are_general() {
        for m in ["si", "Sí", "no", "OK", "okay", "ok!", "a", "", "  "] {
            assert_eq!(classify(m), Intent::General, "{m:?}");
        }
        assert_eq!(RuleEngine::new().explain("sí").rule, "trivial_reply");
    }

    #[test]
    fn creation_of_routines_and_tasks() {
        assert_eq!(classify("crear rutina de ejercicio"), Intent::CreateRoutine);
        assert_eq!(classify("Agrega una tarea nueva"), Intent::CreateRoutine);
        assert_eq!(classify("quiero una nueva rutina"), Intent::CreateRoutine);
    }

    #[test]
    fn stems_match_inflected_forms() {
        assert_eq!(classify("quiero nuevas rutinas de lectura"), Intent::CreateRoutine);
        assert_eq!(classify("quiero crearme una rutina"), Intent::CreateRoutine);
        assert_eq!(classify("agregarle una tarea"), Intent::CreateRoutine);
        assert_eq!(classify("añádeme unas tareas"), Intent::CreateRoutine);
        assert_eq!(classify("iniciaré la rutina correr"), Intent::StartRoutine);
        assert_eq!(classify("empecemos con la rutina"), Intent::StartRoutine);
        assert_eq!(classify("pon horarios nuevos"), Intent::CreateSchedule);
        assert_eq!(classify("elimíname los horarios"), Intent::DeleteSchedules);
        assert_eq!(classify("borremos los horarios"), Intent::DeleteSchedules);
        assert_eq!(classify("comenzamos a trabajar"), Intent::StartWorkSession);
    }

    #[test]
    fn stems_only_anchor_at_word_start() {
        // "responder" contains "pon", "disponible" contains "pon".
        assert_ne!(classify("responder la tarea pendiente"), Intent::CreateRoutine);
        assert_ne!(classify("rutina disponible"), Intent::CreateRoutine);
    }

    #[test]
    fn creation_beats_start() {
        assert_eq!(classify("iniciar y crear rutina de lectura"), Intent::CreateRoutine);
    }

    #[test]
    fn start_routine_needs_both_words() {
        assert_eq!(classify("iniciar rutina correr"), Intent::StartRoutine);
        assert_eq!(classify("Inicia mi rutina"), Intent::StartRoutine);
    }

    #[test]
    fn schedules_create_and_delete() {
        assert_eq!(classify("crear horario de 9am a 5pm"), Intent::CreateSchedule);
        assert_eq!(classify("eliminar horarios del lunes"), Intent::DeleteSchedules);
        assert_eq!(classify("quita el horario del viernes"), Intent::DeleteSchedules);
    }

    #[test]
    fn work_session_needs_start_verb_and_noun() {
        assert_eq!(classify("iniciar jornada"), Intent::StartWorkSession);
        assert_eq!(classify("iniciar sesión de trabajo"), Intent::StartWorkSession);
        assert_eq!(classify("iniciar sesion"), Intent::StartWorkSession);
        assert_ne!(classify("iniciar"), Intent::StartWorkSession);
        assert_ne!(classify("iniciar ahora mismo"), Intent::StartWorkSession);
        assert_ne!(classify("mi jornada de trabajo"), Intent::StartWorkSession);
    }

    #[test]
    fn info_and_help_markers() {
        assert_eq!(classify("¿cuál fue mi última sesión?"), Intent::GetInfo);
        assert_eq!(classify("cuántas rutinas tengo"), Intent::GetInfo);
        assert_eq!(classify("dame un resumen"), Intent::GetInfo);
        assert_eq!(classify("necesito ayuda"), Intent::Help);
        assert_eq!(classify("¿cómo funciona esto?"), Intent::Help);
    }

    #[test]
    fn interrogatives_outrank_help() {
        // "qué" is an info marker and is checked before the help markers.
        assert_eq!(classify("qué puedo hacer"), Intent::GetInfo);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(classify("hola buenos días"), Intent::General);
        assert_eq!(RuleEngine::new().explain("hola buenos días").rule, "fallback");
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }

    proptest! {
        #[test]
        fn start_plus_routine_without_creation_is_start(suffix in "[a-z ]{0,20}") {
            let message = format!("iniciar rutina {suffix}");
            prop_assume!(!CREATE_VERB.is_match(&message));
            prop_assert_eq!(classify(&message), Intent::StartRoutine);
        }

        #[test]
        fn creation_always_wins(verb in "(crear|nueva|agregar|poner)", noun in "(rutina|tarea)") {
            let message = format!("iniciar {verb} {noun} ya");
            prop_assert_eq!(classify(&message), Intent::CreateRoutine);
        }

        #[test]
        fn classification_is_total(s in ".*") {
            let _ = classify(&s);
        }
    }
}
