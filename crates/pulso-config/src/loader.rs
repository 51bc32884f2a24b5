// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pulso.toml` > `~/.config/pulso/pulso.toml` > `/etc/pulso/pulso.toml`
//! with environment variable overrides via `PULSO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PulsoConfig;

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pulso/pulso.toml";

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pulso.toml";

/// Per-user config location under the XDG config directory.
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("pulso/pulso.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pulso/pulso.toml` (system-wide)
/// 3. `~/.config/pulso/pulso.toml` (user XDG config)
/// 4. `./pulso.toml` (local directory)
/// 5. `PULSO_*` environment variables
pub fn load_config() -> Result<PulsoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PulsoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PulsoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PulsoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PulsoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PulsoConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `PULSO_<SECTION>_<KEY>` onto `section.key`.
///
/// Only the first underscore after the section name is a separator, so
/// `PULSO_GEMINI_API_KEY` maps to `gemini.api_key`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PULSO_").map(|key| {
        key.as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("context_", "context.", 1)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PULSO_GEMINI_API_KEY", "from-env");
            jail.set_env("PULSO_AGENT_CONFIRM_DESTRUCTIVE", "false");
            jail.set_env("PULSO_CONTEXT_RECENT_SESSIONS_LIMIT", "3");
            let config: PulsoConfig = Figment::new()
                .merge(Serialized::defaults(PulsoConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
            assert!(!config.agent.confirm_destructive);
            assert_eq!(config.context.recent_sessions_limit, 3);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(LOCAL_CONFIG_FILE, "[agent]\nname = \"local\"\n")?;
            let config = load_config()?;
            assert_eq!(config.agent.name, "local");
            assert_eq!(config.gemini.model, "gemini-1.5-flash");
            Ok(())
        });
    }
}
