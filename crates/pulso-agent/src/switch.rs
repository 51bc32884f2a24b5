// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-wide AI availability switch.
//!
//! Once the provider fails (unreachable, call error, quota), the switch is
//! tripped and every later turn uses the deterministic rules and templates.
//! Nothing re-enables it automatically.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

/// Shared on/off flag for the AI path.
#[derive(Debug)]
pub struct AiSwitch {
    enabled: AtomicBool,
}

impl AiSwitch {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Disables the AI path. Returns `true` if this call changed the state.
    pub fn trip(&self, reason: &str) -> bool {
        let was_enabled = self.enabled.swap(false, Ordering::SeqCst);
        if was_enabled {
            warn!(reason, "AI path disabled for the rest of the session");
        }
        was_enabled
    }

    /// Re-enables the AI path on explicit request.
    pub fn enable(&self) {
        if !self.enabled.swap(true, Ordering::SeqCst) {
            info!("AI path re-enabled");
        }
    }
}

impl Default for AiSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_is_sticky_and_reports_first_transition() {
        let switch = AiSwitch::new(true);
        assert!(switch.trip("unreachable"));
        assert!(!switch.is_enabled());
        assert!(!switch.trip("quota"));
        assert!(!switch.is_enabled());
    }

    #[test]
    fn enable_restores_ai() {
        let switch = AiSwitch::new(false);
        switch.enable();
        assert!(switch.is_enabled());
    }
}
