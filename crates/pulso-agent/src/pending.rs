// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destructive actions parked until the user confirms them.

use std::collections::HashMap;

use pulso_core::Action;
use tokio::sync::Mutex;

/// How a message answers a pending confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationReply {
    Affirmative,
    Negative,
    /// Anything else; the pending action is discarded and the message is
    /// processed normally.
    Other,
}

impl ConfirmationReply {
    pub fn parse(message: &str) -> Self {
        let normalized = message
            .trim()
            .trim_matches(|c: char| c.is_ascii_punctuation() || "¡¿".contains(c))
            .trim()
            .to_lowercase();
        match normalized.as_str() {
            "sí" | "si" | "ok" | "okay" | "dale" | "confirmar" | "confirmo" => Self::Affirmative,
            "no" | "cancelar" | "cancela" => Self::Negative,
            _ => Self::Other,
        }
    }
}

/// At most one parked action per user.
#[derive(Debug, Default)]
pub struct PendingConfirmations {
    actions: Mutex<HashMap<String, Action>>,
}

impl PendingConfirmations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks `action` for `user_id`, replacing any earlier one.
    pub async fn park(&self, user_id: &str, action: Action) {
        self.actions.lock().await.insert(user_id.to_string(), action);
    }

    /// Removes and returns the user's parked action.
    pub async fn take(&self, user_id: &str) -> Option<Action> {
        self.actions.lock().await.remove(user_id)
    }

    pub async fn is_pending(&self, user_id: &str) -> bool {
        self.actions.lock().await.contains_key(user_id)
    }
}

#[cfg(test)]
mod tests {
    use pulso_core::Intent;
    use serde_json::json;

    use super::*;

    #[test]
    fn replies_are_normalized() {
        assert_eq!(ConfirmationReply::parse(" Sí! "), ConfirmationReply::Affirmative);
        assert_eq!(ConfirmationReply::parse("¡dale!"), ConfirmationReply::Affirmative);
        assert_eq!(ConfirmationReply::parse("Cancelar"), ConfirmationReply::Negative);
        assert_eq!(ConfirmationReply::parse("no."), ConfirmationReply::Negative);
        assert_eq!(
            ConfirmationReply::parse("mejor crea una rutina"),
            ConfirmationReply::Other
        );
    }

    #[tokio::test]
    async fn take_clears_the_slot() {
        let pending = PendingConfirmations::new();
        pending
            .park("u", Action::new(Intent::DeleteSchedules, json!({"days": [1]})))
            .await;
        assert!(pending.is_pending("u").await);
        assert!(!pending.is_pending("otro").await);

        let action = pending.take("u").await.unwrap();
        assert_eq!(action.kind, Intent::DeleteSchedules);
        assert!(pending.take("u").await.is_none());
    }
}
