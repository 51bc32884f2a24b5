// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the two AI calls: intent classification and reply
//! generation.

use pulso_core::domain::UserContext;
use pulso_core::types::{ConversationTurn, Role};
use pulso_core::Intent;
use serde_json::{json, Value};

/// Compact, serializable view of the context sent to the provider.
///
/// Only titles, ids, day names and aggregate figures are included.
pub fn context_summary(ctx: &UserContext) -> Value {
    let routines: Vec<Value> = ctx
        .routines
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "title": r.title,
                "active": r.active,
                "completed_count": r.completed_count,
            })
        })
        .collect();
    let schedules: Vec<Value> = ctx
        .schedules
        .iter()
        .map(|s| {
            json!({
                "day": s.day_name,
                "start_time": s.start_time,
                "end_time": s.end_time,
                "active": s.active,
            })
        })
        .collect();

    json!({
        "routines": routines,
        "schedules": schedules,
        "active_session": ctx.has_active_session(),
        "routines_stats": ctx.routines_stats.as_ref().map(|s| json!({
            "total": s.total,
            "active": s.active,
            "most_used": s.most_used.as_ref().map(|r| r.title.clone()),
        })),
        "sessions_stats": ctx.sessions_stats.as_ref().map(|s| json!({
            "completed": s.completed,
            "total_minutes": s.total_minutes,
            "average_minutes": s.average_minutes.round(),
        })),
        "has_data": ctx.has_data,
    })
}

/// Builds the single-shot classification prompt.
///
/// The provider is asked for exactly one JSON object with `intent`,
/// `confidence` and `entities`.
pub fn classification_prompt(message: &str, ctx: &UserContext) -> String {
    let intents = Intent::ALL
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let context = serde_json::to_string_pretty(&context_summary(ctx)).unwrap_or_default();

    format!(
        r#"Eres el clasificador de intenciones de un asistente de productividad.
Analiza el mensaje del usuario y responde ÚNICAMENTE con un objeto JSON, sin texto adicional.

Intenciones válidas: {intents}

Formato de respuesta:
{{
  "intent": "<una de las intenciones válidas>",
  "confidence": <número entre 0 y 1>,
  "entities": {{
    "title": "<título de rutina, si aplica>",
    "description": "<descripción de rutina, si aplica>",
    "routine_name": "<nombre de una rutina existente, si se menciona>",
    "days": [<números de día 0-6, domingo = 0>],
    "start_time": "<HH:MM:SS>",
    "end_time": "<HH:MM:SS>",
    "notes": "<nota para la sesión de trabajo>"
  }}
}}

Omite las entidades que no aparezcan en el mensaje. No inventes datos.

Contexto del usuario:
{context}

Mensaje: "{message}""#
    )
}

/// Builds the system prompt used for reply generation.
pub fn generation_system_prompt(assistant_name: &str, ctx: &UserContext) -> String {
    let context = serde_json::to_string_pretty(&context_summary(ctx)).unwrap_or_default();

    format!(
        r#"Eres {assistant_name}, un asistente de productividad que responde en español, de forma breve y amable.

Solo puedes hablar de los datos del usuario que aparecen en el contexto. Nunca inventes rutinas, horarios, sesiones ni cifras. Si no hay datos, dilo y sugiere cómo empezar.

Esquemas de los datos:
- Rutina: {{ "title": texto obligatorio, "description": texto, "active": booleano, "completed_count": entero }}
- Horario: {{ "day_of_week": 0-6 (domingo = 0), "day_name": texto, "start_time": "HH:MM:SS", "end_time": "HH:MM:SS", "active": booleano }}
- Sesión de trabajo: {{ "started_at": fecha, "ended_at": fecha o nulo, "active": booleano, "duration_minutes": entero o nulo, "notes": texto }}

Ejemplos:
Usuario: crea una rutina llamada Leer
Asistente: ¡Listo! Voy a crear la rutina "Leer".
Usuario: ¿cuántas rutinas tengo?
Asistente: Tienes 2 rutinas activas: Correr y Leer.
Usuario: elimina mis horarios del lunes
Asistente: Entendido, voy a eliminar tus horarios del Lunes.

Contexto del usuario:
{context}"#
    )
}

/// Renders prior turns plus the current message as plain dialogue,
/// ending with an open assistant line.
pub fn format_history(turns: &[ConversationTurn], message: &str) -> String {
    let mut dialogue = String::new();
    for turn in turns {
        let speaker = match turn.role {
            Role::User => "Usuario",
            Role::Assistant => "Asistente",
        };
        dialogue.push_str(speaker);
        dialogue.push_str(": ");
        dialogue.push_str(turn.content.trim());
        dialogue.push('\n');
    }
    dialogue.push_str("Usuario: ");
    dialogue.push_str(message.trim());
    dialogue.push_str("\nAsistente:");
    dialogue
}
