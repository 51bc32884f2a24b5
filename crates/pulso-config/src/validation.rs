// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PulsoConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &PulsoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.agent.name.trim().is_empty() {
        errors.push(ConfigError::validation("agent.name must not be empty"));
    }

    let level = config.agent.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.agent.history_limit == 0 {
        errors.push(ConfigError::validation(
            "agent.history_limit must be greater than 0",
        ));
    }

    if let Some(user_id) = &config.agent.user_id
        && pulso_core::validate_user_id(user_id).is_err()
    {
        errors.push(ConfigError::validation(format!(
            "agent.user_id `{user_id}` is not a valid UUID"
        )));
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::validation("gemini.model must not be empty"));
    }

    let base_url = config.gemini.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "gemini.base_url `{base_url}` must start with http:// or https://"
        )));
    }

    if config.gemini.max_output_tokens == 0 {
        errors.push(ConfigError::validation(
            "gemini.max_output_tokens must be greater than 0",
        ));
    }

    let temperature = config.gemini.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "gemini.temperature must be between 0.0 and 2.0, got {temperature}"
        )));
    }

    if config.gemini.timeout_secs == Some(0) {
        errors.push(ConfigError::validation(
            "gemini.timeout_secs must be greater than 0 when set",
        ));
    }

    if config.context.recent_sessions_limit == 0 {
        errors.push(ConfigError::validation(
            "context.recent_sessions_limit must be greater than 0",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &PulsoConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PulsoConfig::default()).is_ok());
    }

    #[test]
    fn bad_log_level_fails() {
        let mut config = PulsoConfig::default();
        config.agent.log_level = "verbose".into();
        assert!(messages(&config)[0].contains("agent.log_level"));
    }

    #[test]
    fn zero_limits_fail() {
        let mut config = PulsoConfig::default();
        config.agent.history_limit = 0;
        config.context.recent_sessions_limit = 0;
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 2);
        assert!(msgs.iter().any(|m| m.contains("history_limit")));
        assert!(msgs.iter().any(|m| m.contains("recent_sessions_limit")));
    }

    #[test]
    fn temperature_out_of_range_fails() {
        let mut config = PulsoConfig::default();
        config.gemini.temperature = 2.5;
        assert!(messages(&config)[0].contains("temperature"));
    }

    #[test]
    fn zero_timeout_fails_but_unset_passes() {
        let mut config = PulsoConfig::default();
        assert!(config.gemini.timeout_secs.is_none());
        assert!(validate_config(&config).is_ok());

        config.gemini.timeout_secs = Some(0);
        assert!(messages(&config)[0].contains("gemini.timeout_secs"));

        config.gemini.timeout_secs = Some(30);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn malformed_default_user_fails() {
        let mut config = PulsoConfig::default();
        config.agent.user_id = Some("not-a-uuid".into());
        assert!(messages(&config)[0].contains("agent.user_id"));

        config.agent.user_id = Some("123e4567-e89b-42d3-a456-426614174000".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn base_url_needs_scheme() {
        let mut config = PulsoConfig::default();
        config.gemini.base_url = "generativelanguage.googleapis.com".into();
        assert!(messages(&config)[0].contains("base_url"));
    }
}
