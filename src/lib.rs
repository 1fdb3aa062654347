// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          run / plan / projects
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!   shell (command loop: cross, ++, restore, all, <p>/<cmd>)
//!       |                |                    |
//!       v                v                    v
//!    cross           session              engine
//!  parser/planner  State, overrides    ProcessEngine
//!  switch_to       snapshot            (JoinSet + Semaphore)
//!       |                |                    |
//!       +--------> graph (BuildQuery)         v
//!                  toolchain (loader)   core::process
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod cross;
pub mod engine;
pub mod error;
pub mod graph;
pub mod logging;
pub mod session;
pub mod shell;
pub mod toolchain;

#[cfg(test)]
mod testing;
