// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning.
//!
//! ```text
//! ProcessBuilder::shell("sh", "make compile")
//!   .cwd() .env() .prepend_path()
//!   .run(&token)
//!       --> tokio::process::Command
//!           stream stdout/stderr to tracing
//!       --> Ok(()) or ProcessError
//! ```

pub mod builder;
mod runner;
