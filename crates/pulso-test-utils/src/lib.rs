// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pulso integration tests.
//!
//! Provides a mock provider and a harness that wires the full orchestrator
//! over the in-memory store, so pipeline tests run without network access.
//!
//! # Components
//!
//! - [`MockProvider`] - queue-driven provider with failure, quota and
//!   reachability switches
//! - [`TestHarness`] - orchestrator, store and provider assembled for one user

pub mod harness;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder, TEST_USER_ID};
pub use mock_provider::{MockProvider, MockReply};
