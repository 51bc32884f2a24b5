// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Action execution against the tracker stores.
//!
//! Every outcome, including collaborator failures, is folded into an
//! [`ActionResult`] with a Spanish message. Raw error text is logged,
//! never returned to the user.

use std::sync::Arc;

use pulso_core::domain::{NewRoutine, NewSchedule};
use pulso_core::{Action, ActionResult, Intent, PulsoError, RoutineStore, ScheduleStore, SessionStore};
use pulso_intent::{day_name, extract_schedule, join_day_names, DEFAULT_DELETE_DAYS};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::responder::short_time;

#[derive(Deserialize)]
struct StartRoutineData {
    routine_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
struct ScheduleData {
    message: String,
}

#[derive(Deserialize)]
struct DeleteData {
    #[serde(default)]
    days: Option<Vec<u8>>,
}

#[derive(Deserialize)]
struct WorkSessionData {
    #[serde(default)]
    notes: Option<String>,
}

/// Dispatches actions to the five handlers.
#[derive(Clone)]
pub struct ActionExecutor {
    routines: Arc<dyn RoutineStore>,
    schedules: Arc<dyn ScheduleStore>,
    sessions: Arc<dyn SessionStore>,
}

impl ActionExecutor {
    pub fn new(
        routines: Arc<dyn RoutineStore>,
        schedules: Arc<dyn ScheduleStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            routines,
            schedules,
            sessions,
        }
    }

    /// Runs `action` for `user_id`. Never fails; see [`ActionResult::success`].
    pub async fn execute(&self, action: &Action, user_id: &str) -> ActionResult {
        let result = match action.kind {
            Intent::StartRoutine => self.start_routine(action),
            Intent::CreateRoutine => self.create_routine(action, user_id).await,
            Intent::CreateSchedule => self.create_schedule(action, user_id).await,
            Intent::DeleteSchedules => self.delete_schedules(action, user_id).await,
            Intent::StartWorkSession => self.start_work_session(action, user_id).await,
            _ => Ok(ActionResult::failure("Acción no reconocida")),
        };

        match result {
            Ok(result) => {
                info!(
                    action = %action.kind,
                    success = result.success,
                    "action executed"
                );
                result
            }
            Err(e) => {
                warn!(action = %action.kind, error = %e, "action failed");
                ActionResult::failure(failure_message(action.kind))
            }
        }
    }

    fn start_routine(&self, action: &Action) -> Result<ActionResult, PulsoError> {
        let data: StartRoutineData = parse_data(action)?;
        let Some(routine_id) = data.routine_id else {
            return Ok(ActionResult::failure("No se indicó qué rutina iniciar"));
        };
        let title = data.title.unwrap_or_else(|| routine_id.clone());
        Ok(ActionResult::ok(format!("Rutina \"{title}\" iniciada"))
            .with_data(json!({"routine_id": routine_id})))
    }

    async fn create_routine(&self, action: &Action, user_id: &str) -> Result<ActionResult, PulsoError> {
        let routine: NewRoutine = parse_data(action)?;
        if routine.title.trim().is_empty() {
            return Ok(ActionResult::failure("El título de la rutina es obligatorio"));
        }

        let outcome = self.routines.create_routine(user_id, routine).await?;
        match (outcome.success, outcome.record) {
            (true, Some(created)) => {
                let message = outcome
                    .message
                    .unwrap_or_else(|| format!("Rutina \"{}\" creada", created.title));
                Ok(ActionResult::ok(message).with_data(serde_json::to_value(&created).map_err(
                    |e| PulsoError::Internal(format!("failed to serialize routine: {e}")),
                )?))
            }
            _ => Ok(ActionResult::failure(
                outcome
                    .message
                    .unwrap_or_else(|| "No se pudo crear la rutina".to_string()),
            )),
        }
    }

    /// Times and days are re-derived from the original message; one row is
    /// inserted per day. Per-day failures are logged and skipped.
    async fn create_schedule(&self, action: &Action, user_id: &str) -> Result<ActionResult, PulsoError> {
        let data: ScheduleData = parse_data(action)?;
        let request = extract_schedule(&data.message);

        let mut created = Vec::new();
        for day in &request.days {
            let Some(name) = day_name(*day) else {
                continue;
            };
            let row = NewSchedule {
                user_id: user_id.to_string(),
                day_of_week: *day,
                day_name: name.to_string(),
                start_time: request.start_time.clone(),
                end_time: request.end_time.clone(),
                active: true,
            };
            match self.schedules.insert_schedule(row).await {
                Ok(schedule) => created.push(schedule.day_of_week),
                Err(e) => warn!(day, error = %e, "schedule insert failed, skipping day"),
            }
        }

        if created.is_empty() {
            return Ok(ActionResult::failure("No se pudo crear ningún horario"));
        }
        Ok(ActionResult::ok(format!(
            "Horario creado para {} de {} a {}",
            join_day_names(&created),
            short_time(&request.start_time),
            short_time(&request.end_time)
        ))
        .with_data(json!({
            "created": created.len(),
            "days": created,
            "start_time": request.start_time,
            "end_time": request.end_time,
        })))
    }

    async fn delete_schedules(&self, action: &Action, user_id: &str) -> Result<ActionResult, PulsoError> {
        let data: DeleteData = parse_data(action)?;
        let days = data.days.unwrap_or_else(|| DEFAULT_DELETE_DAYS.to_vec());
        let removed = self.schedules.delete_schedules(user_id, &days).await?;
        Ok(ActionResult::ok(format!(
            "Se eliminaron {removed} horarios de {}",
            join_day_names(&days)
        ))
        .with_data(json!({"deleted": removed, "days": days})))
    }

    async fn start_work_session(
        &self,
        action: &Action,
        user_id: &str,
    ) -> Result<ActionResult, PulsoError> {
        let data: WorkSessionData = parse_data(action)?;
        let outcome = self.sessions.start_session(user_id, data.notes).await?;
        match (outcome.success, outcome.record) {
            (true, Some(session)) => Ok(ActionResult::ok(
                outcome
                    .message
                    .unwrap_or_else(|| "Sesión de trabajo iniciada".to_string()),
            )
            .with_data(json!({
                "session_id": session.id,
                "started_at": session.started_at,
            }))),
            _ => Ok(ActionResult::failure(
                outcome
                    .message
                    .unwrap_or_else(|| "No se pudo iniciar la sesión de trabajo".to_string()),
            )),
        }
    }
}

fn parse_data<T: DeserializeOwned>(action: &Action) -> Result<T, PulsoError> {
    serde_json::from_value(action.data.clone())
        .map_err(|e| PulsoError::Internal(format!("invalid {} payload: {e}", action.kind)))
}

fn failure_message(kind: Intent) -> &'static str {
    match kind {
        Intent::StartRoutine => "No se pudo iniciar la rutina",
        Intent::CreateRoutine => "No se pudo crear la rutina",
        Intent::CreateSchedule => "No se pudo crear el horario",
        Intent::DeleteSchedules => "No se pudieron eliminar los horarios",
        Intent::StartWorkSession => "No se pudo iniciar la sesión de trabajo",
        _ => "No se pudo completar la acción",
    }
}
