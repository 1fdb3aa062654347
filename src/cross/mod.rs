// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cross-version planning and version switching.
//!
//! # Architecture
//!
//! ```text
//! "cross -v test"            "++2.13.12! -v compile"
//!       |                              |
//!       v                              v
//!  parser::parse_cross         parser::parse_switch
//!       |                              |
//!       v                              v
//!  planner::plan              switch::switch_to
//!   aggregates + catalog        resolve version/instance
//!   group by version            include/exclude projects
//!   emit PlanStep list          strip + append overrides
//!       |                       reload Structure
//!       v
//!  ++2.12.18 -v core/test ; all a/test b/test ; crossver-restore-session
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`VersionSpec`] | Named version or toolchain home, with a force flag |
//! | [`CrossArgs`] | Parsed `cross` command |
//! | [`SwitchArgs`] | Parsed `++` command |
//! | [`planner::PlanStep`] | One step of a cross plan |
//! | [`switch::SwitchReport`] | Who a switch touched and who it skipped |

pub mod parser;
pub mod planner;
pub mod switch;

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Keyword that starts a cross run.
pub const CROSS_KEYWORD: &str = "cross";

/// Marker that starts a version switch.
pub const SWITCH_MARKER: &str = "++";

/// Internal command appended to every non-empty cross plan.
pub const RESTORE_COMMAND: &str = "crossver-restore-session";

/// Keyword of the batched multi-project run form.
pub const BATCH_KEYWORD: &str = "all";

/// Flag requesting per-project output.
pub const VERBOSE_FLAG: &str = "-v";

/// Which version to switch to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VersionSpec {
    /// A version by name; no toolchain is loaded.
    Named { name: String, force: bool },
    /// A toolchain home directory, optionally with the version to report.
    Home {
        home: PathBuf,
        version_override: Option<String>,
        force: bool,
    },
}

impl VersionSpec {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            force: false,
        }
    }

    /// Apply unconditionally, ignoring compatibility.
    #[must_use]
    pub const fn force(&self) -> bool {
        match self {
            Self::Named { force, .. } | Self::Home { force, .. } => *force,
        }
    }

    #[must_use]
    pub fn home(&self) -> Option<&Path> {
        match self {
            Self::Named { .. } => None,
            Self::Home { home, .. } => Some(home),
        }
    }
}

impl std::fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named { name, .. } => write!(f, "{name}")?,
            Self::Home {
                home,
                version_override,
                ..
            } => {
                if let Some(version) = version_override {
                    write!(f, "{version}")?;
                }
                write!(f, "={}", home.display())?;
            }
        }
        if self.force() {
            write!(f, "!")?;
        }
        Ok(())
    }
}

/// Arguments of `cross [-v] <command>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossArgs {
    pub command: String,
    pub verbose: bool,
}

/// Arguments of `++<version>[!][=<home>] [-v] [<command>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchArgs {
    pub spec: VersionSpec,
    pub verbose: bool,
    pub command: Option<String>,
}

impl SwitchArgs {
    /// Renders back into the textual grammar.
    #[must_use]
    pub fn to_command_line(&self) -> String {
        let mut line = format!("{SWITCH_MARKER}{}", self.spec);
        if self.verbose {
            line.push(' ');
            line.push_str(VERBOSE_FLAG);
        }
        if let Some(command) = &self.command {
            line.push(' ');
            line.push_str(command);
        }
        line
    }
}
