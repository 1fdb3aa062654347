// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the `run` and `plan` commands.

use clap::Args;

/// Arguments for the run command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Command lines, each run after the previous one succeeded
    /// (e.g. "cross test", "++2.13.12 core/compile", "core/test").
    #[arg(required = true, value_name = "COMMAND")]
    pub commands: Vec<String>,
}

/// Arguments for the plan command.
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Plans a verbose run (switches list every project).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Prints the plan as JSON.
    #[arg(long)]
    pub json: bool,

    /// Command to run across versions; words are joined with spaces.
    #[arg(
        required = true,
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl PlanArgs {
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}
