// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command execution engine.
//!
//! # Architecture
//!
//! ```text
//! Shell
//!   "core/test"              --> CommandEngine::run(structure, invocation)
//!   "all a/test b/test"      --> CommandEngine::run_batch(structure, invocations)
//!                                      |
//!                                      v
//!                              ProcessEngine
//!                                prepare(): task lookup or shell fallback,
//!                                           cwd = project base dir,
//!                                           CROSSVER_* env, PATH += bin_dir
//!                                run_batch(): JoinSet + Semaphore(jobs)
//! ```
//!
//! The engine decides how a batch is scheduled; the shell only decides
//! whether to ask for one.

pub mod process;


use futures_util::future::BoxFuture;
use serde::Serialize;

use crate::error::Result;
use crate::graph::ProjectRef;
use crate::session::Structure;

pub use process::ProcessEngine;

/// Resolved toolchain version, exported to every command.
pub const ENV_VERSION: &str = "CROSSVER_VERSION";
/// Binary-compatible identifier of [`ENV_VERSION`].
pub const ENV_BINARY_VERSION: &str = "CROSSVER_BINARY_VERSION";
/// Toolchain home, when one was switched to.
pub const ENV_HOME: &str = "CROSSVER_HOME";
/// Per-version output directory of the project.
pub const ENV_OUTPUT_DIR: &str = "CROSSVER_OUTPUT_DIR";

/// One command bound to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub project: ProjectRef,
    pub command: String,
}

impl Invocation {
    #[must_use]
    pub fn new(project: ProjectRef, command: impl Into<String>) -> Self {
        Self {
            project,
            command: command.into(),
        }
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.project, self.command)
    }
}

/// Executes project commands against the current structure.
///
/// Methods return `BoxFuture` so engines stay object safe.
pub trait CommandEngine: Send + Sync {
    /// Runs a single invocation.
    fn run<'a>(&'a self, structure: &'a Structure, invocation: &'a Invocation)
    -> BoxFuture<'a, Result<()>>;

    /// Runs every invocation, possibly concurrently, and fails if any failed.
    fn run_batch<'a>(
        &'a self,
        structure: &'a Structure,
        invocations: &'a [Invocation],
    ) -> BoxFuture<'a, Result<()>>;
}
