// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification strategies.
//!
//! [`AiClassifier`] asks the provider for a JSON verdict; [`RuleClassifier`]
//! runs the keyword rules and regex extractors. Both yield a
//! [`Classification`] over the same closed intent set.

use std::sync::Arc;

use async_trait::async_trait;
use pulso_context::classification_prompt;
use pulso_core::domain::{Routine, UserContext};
use pulso_core::types::ProviderRequest;
use pulso_core::{Intent, ProviderAdapter, PulsoError};
use pulso_intent::{
    extract_days, extract_routine_entities, extract_schedule, RoutineEntities, RuleEngine,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Confidence reported for keyword matches.
pub const RULE_CONFIDENCE: f32 = 0.6;

/// Which path produced a classification or a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Ai,
    Rules,
}

/// Structured fields attached to an intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Routine name as the user wrote it, or the matched title once resolved.
    pub routine_name: Option<String>,
    /// Id of an existing routine in the user's context.
    pub routine_id: Option<String>,
    /// Ascending, deduplicated, 0 = Sunday.
    pub days: Option<Vec<u8>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

impl Entities {
    /// Reads entity fields leniently from a provider JSON object.
    ///
    /// Blank strings are dropped and day numbers outside 0..=6 are ignored.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let days = value.get("days").and_then(Value::as_array).map(|list| {
            let mut days: Vec<u8> = list
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|d| u8::try_from(d).ok())
                .filter(|d| *d <= 6)
                .collect();
            days.sort_unstable();
            days.dedup();
            days
        });

        Self {
            title: text("title"),
            description: text("description"),
            routine_name: text("routine_name"),
            routine_id: text("routine_id"),
            days: days.filter(|d| !d.is_empty()),
            start_time: text("start_time"),
            end_time: text("end_time"),
            notes: text("notes"),
        }
    }

    fn routine_entities(&self) -> RoutineEntities {
        RoutineEntities {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    /// In `[0, 1]`.
    pub confidence: f32,
    pub entities: Entities,
    pub strategy: Strategy,
}

/// A strategy that maps a message onto an intent with entities.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    fn strategy(&self) -> Strategy;

    async fn classify(
        &self,
        message: &str,
        ctx: &UserContext,
    ) -> Result<Classification, PulsoError>;
}

/// Routine a start request refers to: the first routine whose title appears
/// in the message, else the first active routine.
pub fn routine_for_message<'a>(message: &str, ctx: &'a UserContext) -> Option<&'a Routine> {
    ctx.find_routine(message)
        .or_else(|| ctx.routines.iter().find(|r| r.active))
}

/// Keyword classifier backed by [`RuleEngine`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier {
    engine: RuleEngine,
}

impl RuleClassifier {
    pub fn new() -> Self {
        Self {
            engine: RuleEngine::new(),
        }
    }

    /// Synchronous form of [`IntentClassifier::classify`].
    pub fn analyze(&self, message: &str, ctx: &UserContext) -> Classification {
        let intent = self.engine.classify(message);
        let entities = match intent {
            Intent::CreateRoutine => {
                let found = extract_routine_entities(message);
                Entities {
                    title: found.title,
                    description: found.description,
                    ..Entities::default()
                }
            }
            Intent::StartRoutine => match routine_for_message(message, ctx) {
                Some(routine) => Entities {
                    routine_id: Some(routine.id.clone()),
                    routine_name: Some(routine.title.clone()),
                    ..Entities::default()
                },
                None => Entities::default(),
            },
            Intent::CreateSchedule => {
                let schedule = extract_schedule(message);
                Entities {
                    days: Some(schedule.days),
                    start_time: Some(schedule.start_time),
                    end_time: Some(schedule.end_time),
                    ..Entities::default()
                }
            }
            Intent::DeleteSchedules => Entities {
                days: extract_days(message),
                ..Entities::default()
            },
            _ => Entities::default(),
        };

        Classification {
            intent,
            confidence: RULE_CONFIDENCE,
            entities,
            strategy: Strategy::Rules,
        }
    }
}

#[async_trait]
impl IntentClassifier for RuleClassifier {
    fn strategy(&self) -> Strategy {
        Strategy::Rules
    }

    async fn classify(
        &self,
        message: &str,
        ctx: &UserContext,
    ) -> Result<Classification, PulsoError> {
        Ok(self.analyze(message, ctx))
    }
}

/// Provider-backed classifier.
pub struct AiClassifier {
    provider: Arc<dyn ProviderAdapter>,
}

impl AiClassifier {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl IntentClassifier for AiClassifier {
    fn strategy(&self) -> Strategy {
        Strategy::Ai
    }

    async fn classify(
        &self,
        message: &str,
        ctx: &UserContext,
    ) -> Result<Classification, PulsoError> {
        let request = ProviderRequest {
            temperature: Some(0.0),
            ..ProviderRequest::new(classification_prompt(message, ctx))
        };
        let response = self.provider.complete(request).await?;
        let classification = parse_classification(&response.text, message, ctx)?;
        debug!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "AI classification parsed"
        );
        Ok(classification)
    }
}

#[derive(Deserialize)]
struct RawClassification {
    intent: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    entities: Value,
}

/// Parses the first JSON object in a provider reply into a [`Classification`].
///
/// Unknown intent labels become [`Intent::General`]. Routine references are
/// resolved against `ctx`; ids that do not exist there are dropped. Gaps in
/// routine fields and deletion days are filled from the message itself.
pub fn parse_classification(
    text: &str,
    message: &str,
    ctx: &UserContext,
) -> Result<Classification, PulsoError> {
    let json = extract_json_object(text).ok_or_else(|| {
        PulsoError::MalformedOutput("classification reply contained no JSON object".into())
    })?;
    let raw: RawClassification = serde_json::from_str(json)
        .map_err(|e| PulsoError::MalformedOutput(format!("invalid classification JSON: {e}")))?;

    let intent = Intent::from_label(&raw.intent);
    let mut entities = Entities::from_value(&raw.entities);
    resolve_routine(&mut entities, intent, ctx);

    match intent {
        Intent::CreateRoutine => {
            let merged = entities
                .routine_entities()
                .or(extract_routine_entities(message));
            entities.title = merged.title;
            entities.description = merged.description;
        }
        Intent::DeleteSchedules if entities.days.is_none() => {
            entities.days = extract_days(message);
        }
        _ => {}
    }

    Ok(Classification {
        intent,
        confidence: raw.confidence.unwrap_or(0.0).clamp(0.0, 1.0) as f32,
        entities,
        strategy: Strategy::Ai,
    })
}

fn resolve_routine(entities: &mut Entities, intent: Intent, ctx: &UserContext) {
    if let Some(id) = &entities.routine_id
        && !ctx.routines.iter().any(|r| &r.id == id)
    {
        entities.routine_id = None;
    }
    if entities.routine_id.is_some() {
        return;
    }

    let name = entities.routine_name.clone().or_else(|| {
        if intent == Intent::StartRoutine {
            entities.title.clone()
        } else {
            None
        }
    });
    if let Some(name) = name
        && let Some(routine) = ctx.find_routine(&name)
    {
        entities.routine_id = Some(routine.id.clone());
        entities.routine_name = Some(routine.title.clone());
    }
}

/// Returns the first balanced `{...}` object in `text`, skipping braces that
/// appear inside JSON strings.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
