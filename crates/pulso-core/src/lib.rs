// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pulso conversational assistant.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Pulso workspace. The AI provider and the
//! tracker stores implement traits defined here.

pub mod domain;
pub mod error;
pub mod identity;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PulsoError;
pub use identity::validate_user_id;
pub use types::{Action, ActionResult, AssistantReply, Intent, Role};

pub use traits::{
    PluginAdapter, ProviderAdapter, RoutineStore, ScheduleStore, SessionStore, TranscriptStore,
};
