// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `run` and `plan` commands.

use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::cli::cross::{PlanArgs, RunArgs};
use crate::config::Config;
use crate::cross::planner::{PlanStep, plan};
use crate::engine::ProcessEngine;
use crate::error::Result;
use crate::session::State;
use crate::shell::Shell;
use crate::toolchain::DirectoryLoader;

/// Runs every command line through the shell with the process engine.
///
/// Ctrl+C cancels running processes and fails the current command.
///
/// # Errors
///
/// Returns the first failing command's error.
pub async fn run_run_command(args: &RunArgs, config: &Config, root: &Path) -> Result<()> {
    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting commands...");
            ctrl_c_token.cancel();
        }
    });

    execute_commands(&args.commands, config, root, cancel_token)
        .await
        .map(drop)
}

/// Runs `commands` from a fresh state and returns the final state.
///
/// # Errors
///
/// Returns the first failing command's error.
pub async fn execute_commands(
    commands: &[String],
    config: &Config,
    root: &Path,
    cancel_token: CancellationToken,
) -> Result<State> {
    let engine = ProcessEngine::new(&config.engine)?.with_cancel_token(cancel_token);
    tracing::debug!(jobs = engine.jobs(), dry = engine.is_dry_run(), "engine ready");
    let mut shell = Shell::new(engine, DirectoryLoader, State::from_config(config, root));
    shell.run_commands(commands.iter().cloned()).await?;
    Ok(shell.into_state())
}

/// Plans `cross <command>` from the configured current project.
///
/// # Errors
///
/// Returns `SessionError::NoSession` if no current project is configured.
pub fn plan_steps(args: &PlanArgs, config: &Config, root: &Path) -> Result<Vec<PlanStep>> {
    let state = State::from_config(config, root);
    let current = state.session()?.current().clone();
    Ok(plan(
        state.structure(),
        &current,
        &args.command_line(),
        args.verbose,
    ))
}

/// Prints the plan, one command line per step.
///
/// # Errors
///
/// Returns an error if no session is configured or JSON encoding fails.
pub fn run_plan_command(args: &PlanArgs, config: &Config, root: &Path) -> Result<()> {
    let steps = plan_steps(args, config, root)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }
    if steps.is_empty() {
        println!("Nothing to do: no target project declares a version");
    }
    for line in format_plan(&steps) {
        println!("{line}");
    }
    Ok(())
}

#[must_use]
pub fn format_plan(steps: &[PlanStep]) -> Vec<String> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect()
}
