// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message orchestration for the Pulso assistant.
//!
//! The [`Orchestrator`] turns one user message into one [`AssistantReply`]:
//! - validates the caller's identity
//! - checks the AI provider is reachable and trips the [`AiSwitch`] when it is gone
//! - rebuilds the user's tracker context
//! - classifies the message and drafts a reply, falling back from AI to rules
//! - executes, parks or suppresses the implied action
//! - records both turns of the exchange in the transcript

pub mod classifier;
pub mod executor;
pub mod pending;
pub mod responder;
pub mod switch;

use std::sync::Arc;
use std::time::Instant;

use pulso_config::model::PulsoConfig;
use pulso_context::ContextAggregator;
use pulso_core::domain::UserContext;
use pulso_core::types::{
    estimate_tokens, ConversationTurn, TurnMetadata, CONFIRM_SUGGESTIONS,
};
use pulso_core::{
    validate_user_id, Action, ActionResult, AssistantReply, Intent, ProviderAdapter, PulsoError,
    Role, RoutineStore, ScheduleStore, SessionStore, TranscriptStore,
};
use tracing::{debug, error, info, warn};

pub use classifier::{
    AiClassifier, Classification, Entities, IntentClassifier, RuleClassifier, Strategy,
};
pub use executor::ActionExecutor;
pub use pending::{ConfirmationReply, PendingConfirmations};
pub use responder::{AiResponder, Draft, Responder, ResponseInput, TemplateResponder};
pub use switch::AiSwitch;

/// Reply for failures no fallback could absorb.
pub const APOLOGY_MESSAGE: &str =
    "Lo siento, ocurrió un error al procesar tu mensaje. Por favor, inténtalo de nuevo.";

/// Shown once when the provider's quota runs out.
pub const QUOTA_MESSAGE: &str =
    "Se alcanzó el límite de uso del servicio de IA. Seguiré ayudándote en modo básico.";

pub const CANCELLED_MESSAGE: &str = "De acuerdo, cancelé la acción pendiente.";

const CONFIRM_QUESTION: &str =
    "¿Confirmas? Responde \"sí\" para continuar o \"no\" para cancelar.";

/// Inputs up to this many characters never trigger execution.
const MAX_CONFIRMATION_CHARS: usize = 3;

/// The collaborator stores an orchestrator talks to.
#[derive(Clone)]
pub struct Stores {
    pub routines: Arc<dyn RoutineStore>,
    pub schedules: Arc<dyn ScheduleStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub transcript: Arc<dyn TranscriptStore>,
}

impl Stores {
    /// Uses one store for every collaborator.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: RoutineStore + ScheduleStore + SessionStore + TranscriptStore + 'static,
    {
        Self {
            routines: store.clone(),
            schedules: store.clone(),
            sessions: store.clone(),
            transcript: store,
        }
    }
}

/// Per-turn bookkeeping for AI fallbacks.
#[derive(Debug, Default)]
struct TurnNotes {
    quota_exhausted: bool,
}

/// Processes messages for one chat session.
///
/// The AI switch is owned per instance and can be shared between instances
/// with [`Orchestrator::with_switch`].
pub struct Orchestrator {
    confirm_destructive: bool,
    history_limit: usize,
    switch: Arc<AiSwitch>,
    provider: Option<Arc<dyn ProviderAdapter>>,
    aggregator: ContextAggregator,
    rules: RuleClassifier,
    ai_classifier: Option<AiClassifier>,
    templates: TemplateResponder,
    ai_responder: Option<AiResponder>,
    executor: ActionExecutor,
    transcript: Arc<dyn TranscriptStore>,
    pending: PendingConfirmations,
    chat_session_id: String,
}

impl Orchestrator {
    /// Creates an orchestrator. Without a provider, only rules and templates
    /// are used.
    pub fn new(
        config: &PulsoConfig,
        stores: Stores,
        provider: Option<Arc<dyn ProviderAdapter>>,
    ) -> Self {
        let agent = &config.agent;
        let switch = Arc::new(AiSwitch::new(agent.ai_enabled && provider.is_some()));
        let aggregator = ContextAggregator::new(
            stores.routines.clone(),
            stores.schedules.clone(),
            stores.sessions.clone(),
            &config.context,
        );

        info!(
            agent_name = agent.name.as_str(),
            ai_enabled = switch.is_enabled(),
            "orchestrator initialized"
        );

        Self {
            confirm_destructive: agent.confirm_destructive,
            history_limit: agent.history_limit,
            switch,
            ai_classifier: provider.clone().map(AiClassifier::new),
            ai_responder: provider
                .clone()
                .map(|p| AiResponder::new(p, agent.name.clone())),
            provider,
            aggregator,
            rules: RuleClassifier::new(),
            templates: TemplateResponder::new(agent.name.clone()),
            executor: ActionExecutor::new(stores.routines, stores.schedules, stores.sessions),
            transcript: stores.transcript,
            pending: PendingConfirmations::new(),
            chat_session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Replaces the AI switch, e.g. to share one breaker between sessions.
    pub fn with_switch(mut self, switch: Arc<AiSwitch>) -> Self {
        self.switch = switch;
        self
    }

    /// Continues an existing chat session instead of starting a new one.
    pub fn with_chat_session(mut self, session_id: impl Into<String>) -> Self {
        self.chat_session_id = session_id.into();
        self
    }

    pub fn chat_session_id(&self) -> &str {
        &self.chat_session_id
    }

    pub fn ai_switch(&self) -> Arc<AiSwitch> {
        self.switch.clone()
    }

    pub fn ai_enabled(&self) -> bool {
        self.switch.is_enabled()
    }

    /// Re-enables the AI path. Returns `false` when no provider is configured.
    pub fn enable_ai(&self) -> bool {
        if self.provider.is_none() {
            return false;
        }
        self.switch.enable();
        true
    }

    /// Processes one message from `user_id`.
    ///
    /// Only an invalid user id is returned as an error; every other failure
    /// becomes part of the reply.
    pub async fn process_message(
        &self,
        message: &str,
        user_id: &str,
    ) -> Result<AssistantReply, PulsoError> {
        validate_user_id(user_id)?;
        let started = Instant::now();

        self.check_provider().await;
        let history = self.load_history(user_id).await;
        self.record_turn(user_id, Role::User, message, None).await;

        let mut reply = match self.handle(message, user_id, &history).await {
            Ok(reply) => reply,
            Err(e) => self.failure_reply(&e),
        };

        let tokens_used = estimate_tokens(&reply.message);
        reply.tokens_used = Some(tokens_used);
        let metadata = TurnMetadata {
            intent: reply.intent,
            action_type: reply.action.as_ref().map(|a| a.kind),
            action_data: reply.action.as_ref().map(|a| a.data.clone()),
            action_result: reply.action_result.clone(),
            response_time_ms: started.elapsed().as_millis() as u64,
            tokens_used,
        };
        let metadata = match serde_json::to_value(&metadata) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "failed to serialize turn metadata");
                None
            }
        };
        self.record_turn(user_id, Role::Assistant, &reply.message, metadata)
            .await;

        debug!(
            user_id,
            intent = %reply.intent,
            executed = reply.action_result.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "message processed"
        );
        Ok(reply)
    }

    async fn handle(
        &self,
        message: &str,
        user_id: &str,
        history: &[ConversationTurn],
    ) -> Result<AssistantReply, PulsoError> {
        if let Some(action) = self.pending.take(user_id).await {
            match ConfirmationReply::parse(message) {
                ConfirmationReply::Affirmative => {
                    return Ok(self.execute_confirmed(action, user_id).await);
                }
                ConfirmationReply::Negative => {
                    info!(user_id, action = %action.kind, "pending action cancelled");
                    return Ok(AssistantReply {
                        message: CANCELLED_MESSAGE.to_string(),
                        intent: Intent::General,
                        action: None,
                        action_result: None,
                        suggestions: responder::suggestions_for(
                            Intent::General,
                            &UserContext::default(),
                        ),
                        tokens_used: None,
                    });
                }
                ConfirmationReply::Other => {
                    debug!(user_id, action = %action.kind, "pending action discarded");
                }
            }
        }

        let mut notes = TurnNotes::default();
        let ctx = self.aggregator.build(user_id).await;

        let classification = self.classify(message, &ctx, &mut notes).await?;
        debug!(
            user_id,
            intent = %classification.intent,
            strategy = ?classification.strategy,
            "message classified"
        );

        let input = ResponseInput {
            message,
            classification: &classification,
            context: &ctx,
            history,
        };
        let draft = self.respond(&input, &mut notes).await?;

        let mut reply = AssistantReply {
            message: draft.message,
            intent: classification.intent,
            action: None,
            action_result: None,
            suggestions: draft.suggestions,
            tokens_used: None,
        };

        if let Some(action) = draft.action {
            if message.trim().chars().count() <= MAX_CONFIRMATION_CHARS {
                debug!(user_id, action = %action.kind, "input too short, action not executed");
                reply.suggestions = confirm_suggestions();
            } else if self.confirm_destructive && action.kind.is_destructive() {
                info!(user_id, action = %action.kind, "destructive action awaiting confirmation");
                self.pending.park(user_id, action.clone()).await;
                reply.message = format!("{}\n\n{CONFIRM_QUESTION}", reply.message);
                reply.suggestions = confirm_suggestions();
            } else {
                let result = self.executor.execute(&action, user_id).await;
                reply.message = with_result_suffix(&reply.message, &result);
                reply.action_result = Some(result);
            }
            reply.action = Some(action);
        }

        if notes.quota_exhausted {
            reply.message = format!("{QUOTA_MESSAGE}\n\n{}", reply.message);
        }
        Ok(reply)
    }

    async fn classify(
        &self,
        message: &str,
        ctx: &UserContext,
        notes: &mut TurnNotes,
    ) -> Result<Classification, PulsoError> {
        if self.switch.is_enabled()
            && let Some(ai) = &self.ai_classifier
        {
            match ai.classify(message, ctx).await {
                Ok(classification) => return Ok(classification),
                Err(e) => self.note_ai_failure("classification", &e, notes),
            }
        }
        self.rules.classify(message, ctx).await
    }

    async fn respond(
        &self,
        input: &ResponseInput<'_>,
        notes: &mut TurnNotes,
    ) -> Result<Draft, PulsoError> {
        if self.switch.is_enabled()
            && let Some(ai) = &self.ai_responder
        {
            match ai.respond(input).await {
                Ok(draft) => return Ok(draft),
                Err(e) => self.note_ai_failure("generation", &e, notes),
            }
        }
        self.templates.respond(input).await
    }

    /// Call and quota failures trip the switch; unusable output only skips
    /// AI for this step.
    fn note_ai_failure(&self, stage: &str, e: &PulsoError, notes: &mut TurnNotes) {
        if e.trips_breaker() {
            let tripped = self.switch.trip(&format!("{stage} failed: {e}"));
            if tripped && e.is_quota() {
                notes.quota_exhausted = true;
            }
        } else {
            warn!(stage, error = %e, "AI output unusable, falling back to rules");
        }
    }

    async fn execute_confirmed(&self, action: Action, user_id: &str) -> AssistantReply {
        info!(user_id, action = %action.kind, "pending action confirmed");
        let result = self.executor.execute(&action, user_id).await;
        AssistantReply {
            message: with_result_suffix("Acción confirmada.", &result),
            intent: action.kind,
            suggestions: responder::suggestions_for(action.kind, &UserContext::default()),
            action: Some(action),
            action_result: Some(result),
            tokens_used: None,
        }
    }

    fn failure_reply(&self, e: &PulsoError) -> AssistantReply {
        error!(error = %e, "message processing failed");
        let message = if e.is_quota() {
            self.switch.trip("quota exhausted");
            QUOTA_MESSAGE
        } else {
            APOLOGY_MESSAGE
        };
        AssistantReply {
            message: message.to_string(),
            intent: Intent::General,
            action: None,
            action_result: None,
            suggestions: Vec::new(),
            tokens_used: None,
        }
    }

    async fn check_provider(&self) {
        if !self.switch.is_enabled() {
            return;
        }
        let Some(provider) = &self.provider else {
            return;
        };
        if !provider.verify().await {
            self.switch.trip("provider unreachable");
        }
    }

    /// Prior turns of this chat session, only when AI generation may use them.
    async fn load_history(&self, user_id: &str) -> Vec<ConversationTurn> {
        if self.ai_responder.is_none() || !self.switch.is_enabled() || self.history_limit == 0 {
            return Vec::new();
        }
        match self
            .transcript
            .list_turns(user_id, Some(&self.chat_session_id), self.history_limit)
            .await
        {
            Ok(turns) => turns,
            Err(e) => {
                warn!(user_id, error = %e, "failed to load chat history");
                Vec::new()
            }
        }
    }

    async fn record_turn(
        &self,
        user_id: &str,
        role: Role,
        content: &str,
        metadata: Option<serde_json::Value>,
    ) {
        if let Err(e) = self
            .transcript
            .append_turn(user_id, &self.chat_session_id, role, content, metadata)
            .await
        {
            warn!(user_id, role = %role, error = %e, "failed to record turn");
        }
    }
}

fn confirm_suggestions() -> Vec<String> {
    CONFIRM_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

fn with_result_suffix(message: &str, result: &ActionResult) -> String {
    let mark = if result.success { "✅" } else { "❌" };
    format!("{message}\n\n{mark} {}", result.message)
}
