// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   run, plan, projects, options, files
//! ```

pub mod config;
pub mod cross;
pub mod projects;

#[cfg(test)]
mod tests;
