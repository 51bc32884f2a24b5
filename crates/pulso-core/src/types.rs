// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and pipeline types shared by every Pulso crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Suggestions attached when a bare confirmation-sized reply would otherwise
/// trigger an action.
pub const CONFIRM_SUGGESTIONS: [&str; 3] = ["Sí", "No", "Cancelar"];

/// Closed set of intents the assistant can attach to a user message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StartRoutine,
    CreateRoutine,
    CreateSchedule,
    DeleteSchedules,
    StartWorkSession,
    GetInfo,
    Help,
    General,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 8] = [
        Intent::StartRoutine,
        Intent::CreateRoutine,
        Intent::CreateSchedule,
        Intent::DeleteSchedules,
        Intent::StartWorkSession,
        Intent::GetInfo,
        Intent::Help,
        Intent::General,
    ];

    /// Whether the intent maps to an executable action.
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            Intent::StartRoutine
                | Intent::CreateRoutine
                | Intent::CreateSchedule
                | Intent::DeleteSchedules
                | Intent::StartWorkSession
        )
    }

    /// Whether executing the intent's action removes user data.
    pub fn is_destructive(self) -> bool {
        matches!(self, Intent::DeleteSchedules)
    }

    /// Parses a provider-supplied label, defaulting to [`Intent::General`].
    pub fn from_label(label: &str) -> Intent {
        label.trim().to_lowercase().parse().unwrap_or(Intent::General)
    }
}

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single stored message of a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    pub user_id: String,
    /// Chat session grouping the turn.
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A structured command derived from an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: Intent,
    pub data: serde_json::Value,
}

impl Action {
    pub fn new(kind: Intent, data: serde_json::Value) -> Self {
        Self { kind, data }
    }
}

/// Outcome of executing an [`Action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Reply returned by the orchestrator for one processed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub message: String,
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_result: Option<ActionResult>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

/// Metadata attached to a stored assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMetadata {
    pub intent: Intent,
    pub action_type: Option<Intent>,
    pub action_data: Option<serde_json::Value>,
    pub action_result: Option<ActionResult>,
    pub response_time_ms: u64,
    pub tokens_used: u32,
}

/// Rough token estimate used for transcript metadata: one token per four characters.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    chars.div_ceil(4)
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Store,
}

/// A single-shot text completion request for a generative-AI provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderRequest {
    /// Instructions sent ahead of the prompt, if the provider supports them.
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completed provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_labels_round_trip() {
        for intent in Intent::ALL {
            let label = intent.to_string();
            assert_eq!(Intent::from_label(&label), intent);
        }
        assert_eq!(Intent::StartWorkSession.to_string(), "start_work_session");
    }

    #[test]
    fn unknown_intent_label_is_general() {
        assert_eq!(Intent::from_label("dance"), Intent::General);
        assert_eq!(Intent::from_label("  GET_INFO "), Intent::GetInfo);
    }

    #[test]
    fn action_serializes_kind_as_type() {
        let action = Action::new(Intent::DeleteSchedules, serde_json::json!({"days": [1]}));
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "delete_schedules");
        assert_eq!(json["data"]["days"][0], 1);
    }

    #[test]
    fn only_deletion_is_destructive() {
        let destructive: Vec<_> = Intent::ALL.iter().filter(|i| i.is_destructive()).collect();
        assert_eq!(destructive, vec![&Intent::DeleteSchedules]);
        assert!(!Intent::GetInfo.is_actionable());
    }

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        // Counted in characters, not bytes.
        assert_eq!(estimate_tokens("ñáéí"), 1);
    }
}
