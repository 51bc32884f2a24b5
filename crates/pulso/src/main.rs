// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pulso - a conversational command layer for a personal productivity tracker.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use pulso_config::model::PulsoConfig;
use pulso_config::ConfigError;

/// Pulso - talk to your routines, schedules and work sessions.
#[derive(Parser, Debug)]
#[command(name = "pulso", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat session.
    Shell {
        /// User id (UUID) to chat as. Defaults to `agent.user_id`.
        #[arg(long)]
        user: Option<String>,
        /// Use only the deterministic rules and templates.
        #[arg(long)]
        no_ai: bool,
    },
    /// Show how the rules read a message, as JSON.
    Classify {
        /// The message to analyze.
        message: String,
    },
    /// Validate and print the effective configuration.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<PulsoConfig, Vec<ConfigError>> {
    match path {
        Some(path) => pulso_config::load_and_validate_path(path),
        None => pulso_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulso={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Renders the config as TOML with the API key masked.
fn render_config(config: &PulsoConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.gemini.api_key.is_some() {
        shown.gemini.api_key = Some("********".to_string());
    }
    toml::to_string_pretty(&shown)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            pulso_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.agent.log_level);

    match cli.command {
        Some(Commands::Shell { user, no_ai }) => {
            if let Err(e) = shell::run_shell(config, user, no_ai).await {
                eprintln!("{}: {e}", "error".red());
                std::process::exit(1);
            }
        }
        Some(Commands::Classify { message }) => {
            let report = classify::classify_report(&message);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Config) => match render_config(&config) {
            Ok(rendered) => {
                println!("{}", "configuration is valid".green());
                println!("{rendered}");
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                std::process::exit(1);
            }
        },
        None => {
            println!("pulso: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["pulso", "shell", "--no-ai"]);
        assert!(matches!(cli.command, Some(Commands::Shell { no_ai: true, user: None })));

        let cli = Cli::parse_from(["pulso", "--config", "p.toml", "classify", "crear horario"]);
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Some(Commands::Classify { ref message }) if message == "crear horario"));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulso.toml");
        std::fs::write(&path, "[agent]\nname = \"Asistente\"\nconfirm_destructive = false\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.agent.name, "Asistente");
        assert!(!config.agent.confirm_destructive);
    }

    #[test]
    fn rendered_config_masks_api_key() {
        let mut config = PulsoConfig::default();
        config.gemini.api_key = Some("AIza-secret".into());
        let rendered = render_config(&config).unwrap();
        assert!(!rendered.contains("AIza-secret"));
        assert!(rendered.contains("gemini-1.5-flash"));
    }
}
