// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core process management.
//!
//! ```text
//!          core
//!           |
//!           v
//!        process
//!           |
//!   ProcessBuilder::which --> ProcessBuilder::run
//! ```

pub mod process;
