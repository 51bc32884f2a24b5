// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation.
//!
//! Both responders produce a [`Draft`]: reply text, the action implied by the
//! intent (if any) and follow-up suggestions. The action is always derived
//! from the classification, never from generated text.

use std::sync::Arc;

use async_trait::async_trait;
use pulso_context::{format_history, generation_system_prompt};
use pulso_core::domain::UserContext;
use pulso_core::types::{ConversationTurn, ProviderRequest};
use pulso_core::{Action, Intent, ProviderAdapter, PulsoError};
use pulso_intent::{extract_schedule, join_day_names, RoutineEntities, DEFAULT_DELETE_DAYS};
use serde_json::json;
use tracing::debug;

use crate::classifier::{routine_for_message, Classification, Strategy};

/// Reply to an info request when the user has no tracker data at all.
pub const NO_DATA_MESSAGE: &str = "Aún no tienes rutinas, horarios ni sesiones de trabajo registradas. ¿Quieres crear tu primera rutina?";

pub const HELP_MESSAGE: &str = "Puedo ayudarte con lo siguiente:
• Crear rutinas: \"crea una rutina llamada Leer\"
• Iniciar una rutina: \"iniciar rutina Leer\"
• Crear horarios: \"crear horario de 9 a 5 de lunes a viernes\"
• Eliminar horarios: \"eliminar horarios del lunes\"
• Iniciar tu jornada de trabajo: \"iniciar jornada\"
• Consultar tu resumen: \"¿cuántas rutinas tengo?\"";

/// Everything a responder needs for one turn.
#[derive(Debug, Clone, Copy)]
pub struct ResponseInput<'a> {
    pub message: &'a str,
    pub classification: &'a Classification,
    pub context: &'a UserContext,
    /// Prior turns of the chat session, oldest first.
    pub history: &'a [ConversationTurn],
}

/// Reply text plus the action the intent implies.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub message: String,
    pub action: Option<Action>,
    pub suggestions: Vec<String>,
}

#[async_trait]
pub trait Responder: Send + Sync {
    fn strategy(&self) -> Strategy;

    async fn respond(&self, input: &ResponseInput<'_>) -> Result<Draft, PulsoError>;
}

/// Builds the action an intent implies, or `None` for conversational intents.
///
/// A start request with no routine to start, or a work-session request while
/// one is already running, yields no action.
pub fn derive_action(message: &str, classification: &Classification, ctx: &UserContext) -> Option<Action> {
    let entities = &classification.entities;
    match classification.intent {
        Intent::StartRoutine => {
            let routine = entities
                .routine_id
                .as_deref()
                .and_then(|id| ctx.routines.iter().find(|r| r.id == id))
                .or_else(|| routine_for_message(message, ctx))?;
            Some(Action::new(
                Intent::StartRoutine,
                json!({"routine_id": routine.id, "title": routine.title}),
            ))
        }
        Intent::CreateRoutine => {
            let routine = RoutineEntities {
                title: entities.title.clone(),
                description: entities.description.clone(),
            }
            .into_new_routine();
            Some(Action::new(
                Intent::CreateRoutine,
                json!({"title": routine.title, "description": routine.description}),
            ))
        }
        Intent::CreateSchedule => {
            let preview = extract_schedule(message);
            Some(Action::new(
                Intent::CreateSchedule,
                json!({
                    "message": message,
                    "days": preview.days,
                    "start_time": preview.start_time,
                    "end_time": preview.end_time,
                }),
            ))
        }
        Intent::DeleteSchedules => {
            let days = entities
                .days
                .clone()
                .unwrap_or_else(|| DEFAULT_DELETE_DAYS.to_vec());
            Some(Action::new(Intent::DeleteSchedules, json!({"days": days})))
        }
        Intent::StartWorkSession if !ctx.has_active_session() => Some(Action::new(
            Intent::StartWorkSession,
            json!({"notes": entities.notes}),
        )),
        _ => None,
    }
}

/// Follow-up suggestions offered with a reply.
pub fn suggestions_for(intent: Intent, ctx: &UserContext) -> Vec<String> {
    let list: &[&str] = match intent {
        Intent::CreateRoutine => &["Iniciar rutina", "Crear horario"],
        Intent::StartRoutine if ctx.routines.is_empty() => &["Crear rutina"],
        Intent::StartRoutine | Intent::StartWorkSession => &["Ver mi resumen"],
        Intent::CreateSchedule => &["Ver mi resumen", "Iniciar jornada"],
        Intent::DeleteSchedules => &["Crear horario", "Ver mi resumen"],
        Intent::GetInfo if !ctx.has_data => &["Crear rutina", "Crear horario"],
        Intent::GetInfo => &["Iniciar rutina", "Iniciar jornada"],
        Intent::Help | Intent::General => {
            &["Crear rutina", "Crear horario", "Iniciar jornada", "Ver mi resumen"]
        }
    };
    list.iter().map(|s| s.to_string()).collect()
}

/// Renders the statistics report for an info request.
///
/// Sections whose statistics could not be computed are left out.
pub fn info_report(ctx: &UserContext) -> String {
    if !ctx.has_data {
        return NO_DATA_MESSAGE.to_string();
    }

    let mut lines = vec!["Este es tu resumen:".to_string()];
    if let Some(stats) = &ctx.routines_stats {
        lines.push(format!("• Rutinas: {} ({} activas)", stats.total, stats.active));
        if let Some(top) = &stats.most_used
            && top.completed_count > 0
        {
            lines.push(format!(
                "• Rutina más usada: {} ({} veces)",
                top.title, top.completed_count
            ));
        }
    }
    if let Some(stats) = &ctx.schedules_stats {
        lines.push(format!("• Horarios: {} ({} activos)", stats.total, stats.active));
    }
    if let Some(stats) = &ctx.sessions_stats {
        lines.push(format!(
            "• Sesiones completadas: {} ({} min en total, {:.0} min de promedio)",
            stats.completed, stats.total_minutes, stats.average_minutes
        ));
        if let Some(last) = &stats.last_completed {
            lines.push(format!(
                "• Última sesión: {} ({} min)",
                last.started_at.format("%d/%m/%Y %H:%M"),
                last.duration_minutes.unwrap_or_default()
            ));
        }
    }
    if let Some(active) = &ctx.active_session {
        lines.push(format!(
            "• Jornada en curso desde las {}",
            active.started_at.format("%H:%M")
        ));
    }
    lines.join("\n")
}

/// `HH:MM:SS` to `HH:MM`.
pub(crate) fn short_time(time: &str) -> &str {
    time.get(..5).unwrap_or(time)
}

fn data_str<'a>(action: &'a Action, key: &str) -> &'a str {
    action.data.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

fn data_days(action: &Action) -> Vec<u8> {
    action
        .data
        .get("days")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

/// Canned Spanish replies.
#[derive(Debug, Clone)]
pub struct TemplateResponder {
    assistant_name: String,
}

impl TemplateResponder {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
        }
    }

    /// Synchronous form of [`Responder::respond`].
    pub fn render(&self, input: &ResponseInput<'_>) -> Draft {
        let ctx = input.context;
        let intent = input.classification.intent;
        let action = derive_action(input.message, input.classification, ctx);

        let message = match (intent, &action) {
            (Intent::CreateRoutine, Some(a)) => {
                format!("¡Perfecto! Voy a crear la rutina \"{}\".", data_str(a, "title"))
            }
            (Intent::StartRoutine, Some(a)) => {
                format!("¡Vamos! Iniciando la rutina \"{}\".", data_str(a, "title"))
            }
            (Intent::StartRoutine, None) => {
                "Aún no tienes rutinas para iniciar. ¿Quieres crear una?".to_string()
            }
            (Intent::CreateSchedule, Some(a)) => format!(
                "Voy a crear tu horario de {} a {} para {}.",
                short_time(data_str(a, "start_time")),
                short_time(data_str(a, "end_time")),
                join_day_names(&data_days(a))
            ),
            (Intent::DeleteSchedules, Some(a)) => format!(
                "Voy a eliminar tus horarios de {}.",
                join_day_names(&data_days(a))
            ),
            (Intent::StartWorkSession, Some(_)) => {
                "¡A trabajar! Iniciando tu jornada de trabajo.".to_string()
            }
            (Intent::StartWorkSession, None) => match &ctx.active_session {
                Some(active) => format!(
                    "Ya tienes una sesión de trabajo activa desde las {}.",
                    active.started_at.format("%H:%M")
                ),
                None => "Ya tienes una sesión de trabajo activa.".to_string(),
            },
            (Intent::GetInfo, _) => info_report(ctx),
            (Intent::Help, _) => HELP_MESSAGE.to_string(),
            _ => format!(
                "¡Hola! Soy {}, tu asistente de productividad. ¿En qué te puedo ayudar?",
                self.assistant_name
            ),
        };

        Draft {
            message,
            action,
            suggestions: suggestions_for(intent, ctx),
        }
    }
}

#[async_trait]
impl Responder for TemplateResponder {
    fn strategy(&self) -> Strategy {
        Strategy::Rules
    }

    async fn respond(&self, input: &ResponseInput<'_>) -> Result<Draft, PulsoError> {
        Ok(self.render(input))
    }
}

/// Provider-backed responder. Free text comes from the provider; the action
/// and suggestions are derived exactly as for templates.
pub struct AiResponder {
    provider: Arc<dyn ProviderAdapter>,
    assistant_name: String,
}

impl AiResponder {
    pub fn new(provider: Arc<dyn ProviderAdapter>, assistant_name: impl Into<String>) -> Self {
        Self {
            provider,
            assistant_name: assistant_name.into(),
        }
    }
}

#[async_trait]
impl Responder for AiResponder {
    fn strategy(&self) -> Strategy {
        Strategy::Ai
    }

    async fn respond(&self, input: &ResponseInput<'_>) -> Result<Draft, PulsoError> {
        let request = ProviderRequest::new(format_history(input.history, input.message))
            .with_system_prompt(generation_system_prompt(&self.assistant_name, input.context));
        let response = self.provider.complete(request).await?;

        let text = response.text.trim();
        if text.is_empty() {
            return Err(PulsoError::MalformedOutput("empty reply text".into()));
        }
        debug!(model = %response.model, usage = ?response.usage, "AI reply generated");

        let intent = input.classification.intent;
        Ok(Draft {
            message: text.to_string(),
            action: derive_action(input.message, input.classification, input.context),
            suggestions: suggestions_for(intent, input.context),
        })
    }
}
