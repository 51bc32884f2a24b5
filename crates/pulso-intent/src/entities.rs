// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routine title and description extraction.
//!
//! Both extractors are ordered lists of named patterns; the first pattern
//! that yields a non-empty value wins. Matching is case-insensitive and runs
//! on the original text so extracted values keep their casing.

use std::sync::LazyLock;

use pulso_core::domain::{NewRoutine, DEFAULT_ROUTINE_TITLE};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Routine fields found in a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineEntities {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl RoutineEntities {
    /// Fills gaps in `self` from `fallback`, keeping values already present.
    pub fn or(self, fallback: RoutineEntities) -> RoutineEntities {
        RoutineEntities {
            title: self.title.or(fallback.title),
            description: self.description.or(fallback.description),
        }
    }

    /// Builds the creation payload, applying the default title and an empty
    /// description where nothing was extracted.
    pub fn into_new_routine(self) -> NewRoutine {
        NewRoutine {
            title: self
                .title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_ROUTINE_TITLE.to_string()),
            description: self.description.unwrap_or_default().trim().to_string(),
        }
    }
}

/// A named extraction pattern whose first capture group is the value.
pub struct TextRule {
    pub name: &'static str,
    regex: Regex,
}

impl TextRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    /// Applies this rule alone.
    pub fn capture(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

const VALUE: &str = r#"["'“]?([^,.;:"'”\n]+)"#;

static TITLE_RULES: LazyLock<Vec<TextRule>> = LazyLock::new(|| {
    vec![
        TextRule::new(
            "ponle_label",
            &format!(r"(?i)\b(?:ponle|poner|pon)\s+(?:de\s+|como\s+)?(?:nombre|t[ií]tulo)\s*:?\s*{VALUE}"),
        ),
        TextRule::new(
            "rutina_nueva_phrase",
            &format!(r"(?i)\brutina\s+nueva\s*:?\s+(?:de\s+|para\s+)?{VALUE}"),
        ),
        TextRule::new(
            "labelled_name",
            &format!(r"(?i)(?:\bse\s+llama|\bllamad[ao]|\bllamar(?:la|lo)?|\bt[ií]tulo|\bnombre)\s*:?\s*{VALUE}"),
        ),
        TextRule::new(
            "labelled_routine",
            &format!(r"(?i)\b(?:rutina|tarea)s?\s*:?\s+(?:nueva\s+)?(?:de\s+|para\s+)?{VALUE}"),
        ),
        TextRule::new(
            "positional_after_comma",
            &format!(r"(?i)\b(?:crear|crea|nueva)\s+rutina\s*,\s*{VALUE}"),
        ),
    ]
});

static DESCRIPTION_RULES: LazyLock<Vec<TextRule>> = LazyLock::new(|| {
    vec![
        TextRule::new(
            "labelled_description",
            r#"(?i)(?:\ben\s+|\bla\s+|\bcon\s+)*descripci[oó]n\s*(?:(?:ponle|pon|es|de)\b)?\s*:?\s*["'“]?([^."'”\n]+)"#,
        ),
        TextRule::new("gemini_literal", r"(?i)\b(hecha\s+por\s+gemini)\b"),
    ]
});

/// Cuts a captured title where a description clause starts.
static DESCRIPTION_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:\by\b|\bcon\b)?\s*(?:\ben\s+)?(?:\bla\s+)?descripci[oó]n.*$").unwrap()
});

/// Words that only ever appear as filler after a label.
const FILLER_TITLES: &[&str] = &["nueva", "nuevo", "de", "para", "una", "un", "la", "el"];

fn clean_title(raw: &str) -> Option<String> {
    let cut = DESCRIPTION_TAIL.replace(raw, "");
    let title = cut
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim();
    let lower = title.to_lowercase();
    if title.is_empty() || FILLER_TITLES.contains(&lower.as_str()) {
        None
    } else {
        Some(title.to_string())
    }
}

fn clean_description(raw: &str) -> Option<String> {
    let description = raw.trim().trim_end_matches(|c: char| c.is_ascii_punctuation()).trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// Looks up a title rule by name.
pub fn title_rule(name: &str) -> Option<&'static TextRule> {
    TITLE_RULES.iter().find(|r| r.name == name)
}

/// Looks up a description rule by name.
pub fn description_rule(name: &str) -> Option<&'static TextRule> {
    DESCRIPTION_RULES.iter().find(|r| r.name == name)
}

/// Extracts the routine title, trying each title rule in order.
pub fn extract_title(message: &str) -> Option<String> {
    TITLE_RULES
        .iter()
        .find_map(|rule| rule.capture(message).and_then(|raw| clean_title(&raw)))
}

/// Extracts the routine description, trying each description rule in order.
pub fn extract_description(message: &str) -> Option<String> {
    DESCRIPTION_RULES
        .iter()
        .find_map(|rule| rule.capture(message).and_then(|raw| clean_description(&raw)))
}

/// Extracts routine fields from free text. Never fails; missing fields stay `None`.
pub fn extract_routine_entities(message: &str) -> RoutineEntities {
    RoutineEntities {
        title: extract_title(message),
        description: extract_description(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_by(rule: &str, text: &str) -> Option<String> {
        title_rule(rule).unwrap().capture(text).and_then(|raw| clean_title(&raw))
    }

    #[test]
    fn ponle_label_rule() {
        assert_eq!(title_by("ponle_label", "ponle de nombre Yoga matutino"), Some("Yoga matutino".into()));
        assert_eq!(title_by("ponle_label", "poner título: Lectura"), Some("Lectura".into()));
        assert_eq!(title_by("ponle_label", "crea una rutina"), None);
    }

    #[test]
    fn rutina_nueva_rule() {
        assert_eq!(title_by("rutina_nueva_phrase", "crea una rutina nueva de meditar"), Some("meditar".into()));
        assert_eq!(title_by("rutina_nueva_phrase", "quiero una rutina nueva"), None);
    }

    #[test]
    fn labelled_name_rule() {
        assert_eq!(title_by("labelled_name", "una rutina llamada Correr 5k"), Some("Correr 5k".into()));
        assert_eq!(title_by("labelled_name", "nombre: Estudiar"), Some("Estudiar".into()));
        assert_eq!(title_by("labelled_name", "que se llama \"Pausa activa\""), Some("Pausa activa".into()));
    }

    #[test]
    fn labelled_routine_rule() {
        assert_eq!(title_by("labelled_routine", "crea rutina correr"), Some("correr".into()));
        assert_eq!(title_by("labelled_routine", "agrega la tarea de estudiar"), Some("estudiar".into()));
        assert_eq!(title_by("labelled_routine", "nueva rutina"), None);
    }

    #[test]
    fn positional_rule() {
        assert_eq!(title_by("positional_after_comma", "crear rutina, leer 20 páginas"), Some("leer 20 páginas".into()));
        assert_eq!(title_by("positional_after_comma", "crear rutina leer"), None);
    }

    #[test]
    fn description_rules() {
        let labelled = description_rule("labelled_description").unwrap();
        assert_eq!(labelled.capture("en la descripción ponle: estirar 10 min").as_deref(), Some("estirar 10 min"));
        assert_eq!(labelled.capture("con descripción de limpieza").as_deref(), Some("limpieza"));
        assert_eq!(labelled.capture("descripción estudiar").as_deref(), Some("estudiar"));
        let literal = description_rule("gemini_literal").unwrap();
        assert_eq!(literal.capture("rutina hecha por Gemini").as_deref(), Some("hecha por Gemini"));
    }

    #[test]
    fn title_and_description_scenario() {
        let e = extract_routine_entities("crea rutina correr, descripción hecha por gemini");
        assert_eq!(e.title.as_deref(), Some("correr"));
        assert_eq!(e.description.as_deref(), Some("hecha por gemini"));
    }

    #[test]
    fn title_stops_before_description_without_comma() {
        let e = extract_routine_entities("crea rutina meditar con descripción respirar profundo");
        assert_eq!(e.title.as_deref(), Some("meditar"));
        assert_eq!(e.description.as_deref(), Some("respirar profundo"));
    }

    #[test]
    fn earlier_rules_win_on_overlap() {
        // Both "ponle nombre" and "rutina <value>" match; the label wins.
        let e = extract_routine_entities("crea una rutina y ponle nombre Caminar");
        assert_eq!(e.title.as_deref(), Some("Caminar"));
        // "llamada" outranks the bare noun that precedes it.
        let e = extract_routine_entities("nueva rutina llamada Yoga");
        assert_eq!(e.title.as_deref(), Some("Yoga"));
    }

    #[test]
    fn defaults_apply_when_nothing_found() {
        let payload = extract_routine_entities("crear nueva rutina").into_new_routine();
        assert_eq!(payload.title, DEFAULT_ROUTINE_TITLE);
        assert_eq!(payload.description, "");
    }

    #[test]
    fn or_keeps_present_values() {
        let ai = RoutineEntities { title: Some("Correr".into()), description: None };
        let rules = RoutineEntities { title: Some("otro".into()), description: Some("desc".into()) };
        let merged = ai.or(rules);
        assert_eq!(merged.title.as_deref(), Some("Correr"));
        assert_eq!(merged.description.as_deref(), Some("desc"));
    }
}
