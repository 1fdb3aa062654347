// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for crossver using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! crossver [global options] <command>
//! run <COMMAND>...          queue command lines (cross, ++, <project>/<cmd>, ...)
//! plan [-v] [--json] <COMMAND>...
//! projects [PATTERN] [--json]
//! options
//! files
//! version
//! ```

pub mod cross;
pub mod global;
pub mod projects;


use crate::cli::cross::{PlanArgs, RunArgs};
use crate::cli::global::GlobalOptions;
use crate::cli::projects::ProjectsArgs;
use clap::{Parser, Subcommand};

/// Cross-Version Build Orchestrator
///
/// Runs build commands across every toolchain version a project supports.
#[derive(Debug, Parser)]
#[command(
    name = "crossver",
    author,
    version,
    about = "Cross-Version Build Orchestrator",
    long_about = "crossver Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs build commands across every toolchain version a project\n\
                  supports.\n\n\
                  `crossver run \"cross test\"` runs `test` once per declared\n\
                  version and restores the session afterwards. `crossver run\n\
                  \"++2.13.12 core/test\"` switches once and runs a single command.\n\
                  See `crossver <command> --help` for more information.",
    after_help = "CONFIGURATION FILES:\n\n\
                  crossver reads `crossver.toml` from the workspace root if it\n\
                  exists. Files given with --config are loaded after it, in order,\n\
                  then CROSSVER_<SECTION>__<KEY> environment variables, then\n\
                  --set options. Later sources override earlier ones."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files that were loaded.
    Files,

    /// Runs command lines in order, stopping at the first failure.
    Run(RunArgs),

    /// Prints the steps `cross <COMMAND>` would run, without running them.
    Plan(PlanArgs),

    /// Lists projects with their versions.
    Projects(ProjectsArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
