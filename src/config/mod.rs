// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Declared build configuration for crossver.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. crossver.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. CROSSVER_* env vars
//! 5. --set KEY=VALUE
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! CROSSVER_ENGINE__JOBS=8          → engine.jobs = 8
//! CROSSVER_TOOLCHAIN__VERSION=2.13 → toolchain.version = "2.13"
//! CROSSVER_SESSION__PROJECT=core   → session.project = "core"
//! ```
//!
//! # Project Declarations
//!
//! ```toml
//! [units.root.projects.core]
//! aggregate = ["util"]
//! cross_versions = ["2.12.18", "2.13.12"]
//!
//! [units.root.projects.core.tasks]
//! compile = "make compile"
//! ```
//!
//! This is the declared base configuration only. Ad hoc overrides applied by
//! version switches live in [`crate::session`] and never touch this value.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{EngineConfig, SessionConfig, ToolchainConfig, UnitConfig};

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE: &str = "crossver.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "CROSSVER";

/// Complete application configuration.
///
/// Unknown top-level keys are ignored: child processes inherit
/// `CROSSVER_VERSION` and friends, which the environment source would
/// otherwise read back as configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Current project selection.
    pub session: SessionConfig,
    /// Toolchain defaults.
    pub toolchain: ToolchainConfig,
    /// Command engine options.
    pub engine: EngineConfig,
    /// Build units and their projects.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub units: BTreeMap<String, UnitConfig>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use crossver::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("crossver.toml")
    ///     .with_env_prefix("CROSSVER")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks cross-references that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the session points at an unknown unit or
    /// project, or a declared version cannot be written as a `++` token.
    pub fn validate(&self) -> Result<()> {
        if let Some(project) = &self.session.project {
            let unit = self.units.get(&self.session.unit).ok_or_else(|| {
                ConfigError::InvalidValue {
                    section: "session".to_string(),
                    key: "unit".to_string(),
                    message: format!("unknown build unit '{}'", self.session.unit),
                }
            })?;
            if !unit.projects.contains_key(project) {
                return Err(ConfigError::InvalidValue {
                    section: "session".to_string(),
                    key: "project".to_string(),
                    message: format!(
                        "project '{project}' is not declared in unit '{}'",
                        self.session.unit
                    ),
                }
                .into());
            }
        }

        if let Some(version) = &self.toolchain.version {
            check_version("toolchain", "version", version)?;
        }
        for (unit_id, unit) in &self.units {
            for (project_id, project) in &unit.projects {
                let section = format!("units.{unit_id}.projects.{project_id}");
                for version in &project.cross_versions {
                    check_version(&section, "cross_versions", version)?;
                }
                if let Some(version) = &project.version {
                    check_version(&section, "version", version)?;
                }
            }
        }
        Ok(())
    }

    /// Total number of declared projects across all units.
    #[must_use]
    pub fn project_count(&self) -> usize {
        self.units.values().map(|u| u.projects.len()).sum()
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert("session.unit".to_string(), self.session.unit.clone());
        options.insert(
            "session.project".to_string(),
            self.session.project.clone().unwrap_or_default(),
        );
        options.insert("toolchain.name".to_string(), self.toolchain.name.clone());
        options.insert(
            "toolchain.version".to_string(),
            self.toolchain.version.clone().unwrap_or_default(),
        );
        options.insert(
            "toolchain.compat".to_string(),
            self.toolchain.compat.to_string(),
        );
        options.insert("engine.shell".to_string(), self.engine.shell.clone());
        options.insert("engine.jobs".to_string(), self.engine.jobs.to_string());
        options.insert("engine.dry".to_string(), self.engine.dry.to_string());

        for (unit_id, unit) in &self.units {
            options.insert(
                format!("units.{unit_id}.base"),
                unit.base.display().to_string(),
            );
            for (project_id, project) in &unit.projects {
                let prefix = format!("units.{unit_id}.projects.{project_id}");
                if !project.aggregate.is_empty() {
                    options.insert(format!("{prefix}.aggregate"), project.aggregate.join(", "));
                }
                if !project.cross_versions.is_empty() {
                    options.insert(
                        format!("{prefix}.cross_versions"),
                        project.cross_versions.join(", "),
                    );
                }
                if let Some(version) = &project.version {
                    options.insert(format!("{prefix}.version"), version.clone());
                }
            }
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

/// Rejects versions that would change meaning when rendered into a
/// `++<version>` command and parsed back.
fn check_version(section: &str, key: &str, version: &str) -> Result<()> {
    let problem = if version.trim().is_empty() {
        Some("versions must not be empty")
    } else if version.contains(char::is_whitespace) {
        Some("must not contain whitespace")
    } else if version.contains('=') {
        Some("must not contain '='")
    } else if version.ends_with('!') {
        Some("must not end with '!'")
    } else if version.starts_with('-') {
        Some("must not start with '-'")
    } else {
        None
    };
    match problem {
        Some(message) => Err(ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: format!("invalid version '{version}': {message}"),
        }
        .into()),
        None => Ok(()),
    }
}
