// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::Args;

/// Arguments for the projects command.
#[derive(Debug, Clone, Args)]
pub struct ProjectsArgs {
    /// Glob over project ids (`core*`), or over `<unit>/<id>` when it
    /// contains a slash (`plugins/*`).
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Prints the listing as JSON.
    #[arg(long)]
    pub json: bool,
}
