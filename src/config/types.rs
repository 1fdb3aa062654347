// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for crossver.
//!
//! # Config Structure
//!
//! ```text
//! Config: SessionConfig, ToolchainConfig, EngineConfig
//! units: unit id --> UnitConfig { base, projects }
//! projects: project id --> ProjectConfig { base, aggregate, cross_versions, version, tasks }
//! ```
//!
//! # Compatibility Scheme
//!
//! ```text
//! CompatScheme: Minor (default) | Major | Exact
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Id of the build unit used when a project reference omits one.
pub const ROOT_UNIT: &str = "root";

/// How version strings are normalized into binary-compatible identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatScheme {
    /// `X.Y.Z` is compatible with every `X.Y.*` release.
    #[default]
    Minor,
    /// `X.Y.Z` is compatible with every `X.*` release.
    Major,
    /// Only identical version strings are compatible.
    Exact,
}

impl std::fmt::Display for CompatScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

impl std::str::FromStr for CompatScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            "exact" => Ok(Self::Exact),
            _ => Err(ConfigError::InvalidValue {
                section: "toolchain".to_string(),
                key: "compat".to_string(),
                message: format!("expected 'minor', 'major', or 'exact', got '{s}'"),
            }),
        }
    }
}

/// Which project the session is focused on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Build unit of the current project.
    pub unit: String,
    /// Current project id. No project means no session is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            unit: ROOT_UNIT.to_string(),
            project: None,
        }
    }
}

/// Toolchain defaults shared by every project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Short toolchain name, used for derived output directories.
    pub name: String,
    /// Version every project uses unless it pins its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Binary compatibility scheme.
    pub compat: CompatScheme,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            name: "toolchain".to_string(),
            version: None,
            compat: CompatScheme::Minor,
        }
    }
}

/// Command engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Shell used for commands that are not declared tasks.
    pub shell: String,
    /// Maximum concurrent invocations within a batch (0 = available parallelism).
    pub jobs: usize,
    /// Log commands instead of spawning them.
    pub dry: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shell: default_shell().to_string(),
            jobs: 0,
            dry: false,
        }
    }
}

const fn default_shell() -> &'static str {
    if cfg!(windows) { "cmd" } else { "sh" }
}

/// A build unit: a directory holding a set of projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitConfig {
    /// Unit base directory, relative to the working directory.
    pub base: PathBuf,
    /// Projects declared in this unit.
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            base: PathBuf::from("."),
            projects: BTreeMap::new(),
        }
    }
}

/// A single project declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project directory, relative to the unit base. Defaults to the project id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<PathBuf>,
    /// Aggregated projects: `id` within this unit or `{unit}id` elsewhere.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aggregate: Vec<String>,
    /// Declared supported versions, in preference order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cross_versions: Vec<String>,
    /// Pinned version for this project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Named commands runnable as `<project>/<task>`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tasks: BTreeMap<String, String>,
}
