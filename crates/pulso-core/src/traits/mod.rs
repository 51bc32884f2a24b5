// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Pulso collaborator seams.
//!
//! The AI provider extends the [`PluginAdapter`] base trait; the tracker
//! stores are plain `Send + Sync` async traits. All use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod provider;
pub mod routine;
pub mod schedule;
pub mod session;
pub mod transcript;

pub use adapter::PluginAdapter;
pub use provider::ProviderAdapter;
pub use routine::RoutineStore;
pub use schedule::ScheduleStore;
pub use session::SessionStore;
pub use transcript::{ChatSessionSummary, TranscriptStore};
