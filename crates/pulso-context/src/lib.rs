// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context engine for the Pulso assistant.
//!
//! - [`ContextAggregator`] rebuilds a [`UserContext`](pulso_core::domain::UserContext)
//!   for every message from the tracker stores.
//! - [`stats`] derives the summary figures attached to that context.
//! - [`prompt`] turns context and history into provider prompts.

pub mod aggregator;
pub mod prompt;
pub mod stats;

pub use aggregator::ContextAggregator;
pub use prompt::{classification_prompt, context_summary, format_history, generation_system_prompt};
