// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pulso shell` command implementation.
//!
//! Launches an interactive REPL over an in-memory tracker. Uses Gemini when
//! available and the deterministic rules otherwise. One chat session per
//! invocation.

use std::sync::Arc;

use colored::Colorize;
use pulso_agent::{Orchestrator, Stores};
use pulso_config::model::PulsoConfig;
use pulso_core::{validate_user_id, AssistantReply, ProviderAdapter, PulsoError, TranscriptStore};
use pulso_gemini::GeminiProvider;
use pulso_store::InMemoryStore;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};

/// Runs the `pulso shell` interactive REPL.
pub async fn run_shell(
    config: PulsoConfig,
    user: Option<String>,
    no_ai: bool,
) -> Result<(), PulsoError> {
    let user_id = resolve_user(user, &config);
    validate_user_id(&user_id)?;

    let provider = if no_ai || !config.agent.ai_enabled {
        info!("AI disabled, using rules only");
        None
    } else {
        match GeminiProvider::new(&config.gemini) {
            Ok(provider) => Some(Arc::new(provider) as Arc<dyn ProviderAdapter>),
            Err(e) => {
                warn!(error = %e, "Gemini unavailable, continuing with rules only");
                None
            }
        }
    };

    let store = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(&config, Stores::shared(store.clone()), provider);

    let mut rl = DefaultEditor::new()
        .map_err(|e| PulsoError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "pulso shell".bold().green());
    let mode = if orchestrator.ai_enabled() { "IA" } else { "básico" };
    println!("Usuario {} · modo {}", user_id.dimmed(), mode.cyan());
    println!(
        "Type {} to exit, {} to retry AI, {} to end a work session, {} for chat stats.\n",
        "/quit".yellow(),
        "/ai".yellow(),
        "/end".yellow(),
        "/history".yellow()
    );

    let prompt = format!("{}> ", "pulso".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/quit" | "/exit" => break,
                    "/ai" => {
                        if orchestrator.enable_ai() {
                            println!("{}", "IA reactivada.".green());
                        } else {
                            println!("{}", "No hay un proveedor de IA configurado.".yellow());
                        }
                    }
                    "/end" => match store.end_session(&user_id).await {
                        Ok(Some(session)) => println!(
                            "Sesión finalizada ({} min).",
                            session.duration_minutes.unwrap_or(0)
                        ),
                        Ok(None) => println!("No tienes una sesión activa."),
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    },
                    "/history" => print_history(store.as_ref(), &user_id).await,
                    _ => match orchestrator.process_message(trimmed, &user_id).await {
                        Ok(reply) => print_reply(&reply),
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "¡Hasta luego!".dimmed());
    Ok(())
}

/// CLI flag, then `agent.user_id`, then a fresh id.
fn resolve_user(user: Option<String>, config: &PulsoConfig) -> String {
    user.or_else(|| config.agent.user_id.clone())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn print_reply(reply: &AssistantReply) {
    println!("{}", reply.message);
    if !reply.suggestions.is_empty() {
        println!("{}", format!("  → {}", reply.suggestions.join(" · ")).dimmed());
    }
    println!();
}

async fn print_history(store: &InMemoryStore, user_id: &str) {
    match store.session_summaries(user_id).await {
        Ok(summaries) if summaries.is_empty() => println!("Sin conversaciones registradas."),
        Ok(summaries) => {
            for summary in summaries {
                println!(
                    "{}  {} turnos · {} tokens · {}",
                    summary.session_id.dimmed(),
                    summary.turn_count,
                    summary.tokens_used,
                    summary.last_at.format("%d/%m/%Y %H:%M")
                );
            }
        }
        Err(e) => eprintln!("{}: {e}", "error".red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_user_wins_over_config() {
        let mut config = PulsoConfig::default();
        config.agent.user_id = Some("from-config".into());
        assert_eq!(resolve_user(Some("from-flag".into()), &config), "from-flag");
        assert_eq!(resolve_user(None, &config), "from-config");
    }

    #[test]
    fn generated_user_is_valid() {
        let user = resolve_user(None, &PulsoConfig::default());
        assert!(validate_user_id(&user).is_ok());
    }
}
