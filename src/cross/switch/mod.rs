// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version switching.
//!
//! ```text
//! VersionSpec
//!   Named "2.13.12"          --> version = name, no instance
//!   Home  "[v]=<home>"       --> loader.load(base_dir(current) / home)
//!                                version = v or instance.version()
//!        |
//!        v
//! binary_version(version) --> partition projects by catalog match
//!        |                     (force: every project + unit + global scope)
//!        v
//! overrides - {targeted scope x version/home/instance} + new overrides
//!        |
//!        v
//! State::with_overrides  (Structure reloaded)
//! ```

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use super::{SWITCH_MARKER, VERBOSE_FLAG, VersionSpec};
use crate::error::{Result, SessionError, ToolchainError};
use crate::graph::catalog::versions_for;
use crate::graph::{BuildQuery, ProjectRef};
use crate::session::{Scope, SettingKey, SettingOverride, SettingValue, State};
use crate::toolchain::version::{binary_version, is_compatible};
use crate::toolchain::{ToolchainInstance, ToolchainLoader};

/// A project and the versions its catalog declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectVersions {
    pub project: ProjectRef,
    pub versions: Vec<String>,
}

/// Outcome of one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchReport {
    pub spec: VersionSpec,
    pub version: String,
    pub binary_version: String,
    pub instance: Option<ToolchainInstance>,
    pub included: Vec<ProjectVersions>,
    pub excluded: Vec<ProjectVersions>,
}

impl SwitchReport {
    /// Human readable summary; `current` is marked with `*` in verbose mode.
    #[must_use]
    pub fn summary_lines(&self, current: &ProjectRef, verbose: bool) -> Vec<String> {
        let mut lines = Vec::new();

        if self.spec.force() {
            lines.push(format!(
                "Forcing version {} on all {} projects",
                self.version,
                self.included.len()
            ));
        } else {
            lines.push(format!(
                "Setting version to {} on {} projects",
                self.version,
                self.included.len()
            ));
        }

        if verbose {
            if !self.included.is_empty() {
                lines.push("Switching version on:".to_string());
                lines.extend(self.included.iter().map(|entry| project_line(entry, current)));
            }
            if !self.excluded.is_empty() {
                lines.push("Excluding projects:".to_string());
                lines.extend(self.excluded.iter().map(|entry| project_line(entry, current)));
            }
        } else if !self.excluded.is_empty() {
            lines.push(format!(
                "Excluded {} projects, run {SWITCH_MARKER}{} {VERBOSE_FLAG} for more details",
                self.excluded.len(),
                self.spec
            ));
        }

        lines
    }
}

fn project_line(entry: &ProjectVersions, current: &ProjectRef) -> String {
    let marker = if &entry.project == current { '*' } else { ' ' };
    format!(
        "  {marker} {} ({})",
        entry.project,
        entry.versions.join(", ")
    )
}

/// Switches the session to `spec` and reloads the structure.
///
/// # Errors
///
/// Returns `SessionError::NoSession` without a loaded session,
/// `ToolchainError::HomeNotFound` when a home directory does not exist, and
/// any error of the toolchain loader.
pub fn switch_to<L: ToolchainLoader + ?Sized>(
    spec: &VersionSpec,
    verbose: bool,
    state: State,
    loader: &L,
) -> Result<(State, SwitchReport)> {
    let current = state.session()?.current().clone();
    let structure = state.structure();

    let (version, home, instance) = match spec {
        VersionSpec::Named { name, .. } => (name.clone(), None, None),
        VersionSpec::Home {
            home,
            version_override,
            ..
        } => {
            let base = structure
                .base_dir(&current)
                .ok_or_else(|| SessionError::ProjectNotFound {
                    project: current.to_string(),
                })?;
            let path = base.join(home);
            if !path.exists() {
                return Err(ToolchainError::HomeNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            let instance = loader.load(&path)?;
            let version = version_override
                .clone()
                .unwrap_or_else(|| instance.version().to_string());
            (version, Some(path), Some(instance))
        }
    };

    let compat = structure.compat();
    let binary = binary_version(&version, compat);

    let (included, excluded): (Vec<_>, Vec<_>) = structure
        .projects()
        .into_iter()
        .map(|project| ProjectVersions {
            versions: versions_for(structure, &project),
            project,
        })
        .partition(|entry| {
            spec.force()
                || entry
                    .versions
                    .iter()
                    .any(|v| is_compatible(v, &version, compat))
        });

    let mut scopes: Vec<Scope> = included
        .iter()
        .map(|entry| Scope::Project(entry.project.clone()))
        .collect();
    if spec.force() {
        scopes.extend(structure.units().into_iter().map(Scope::Unit));
        scopes.push(Scope::Global);
    }

    let overrides = rewrite_overrides(
        &state.overrides(),
        &scopes,
        &version,
        home,
        instance.as_ref(),
    );

    let report = SwitchReport {
        spec: spec.clone(),
        version,
        binary_version: binary,
        instance,
        included,
        excluded,
    };
    tracing::debug!(
        version = %report.version,
        binary_version = %report.binary_version,
        included = report.included.len(),
        excluded = report.excluded.len(),
        overrides = overrides.len(),
        "switching version"
    );
    for line in report.summary_lines(&current, verbose) {
        tracing::info!("{line}");
    }

    let state = state.with_overrides(Arc::from(overrides))?;
    Ok((state, report))
}

/// Strips every switched key for `scopes`, then appends the new overrides.
fn rewrite_overrides(
    existing: &[SettingOverride],
    scopes: &[Scope],
    version: &str,
    home: Option<PathBuf>,
    instance: Option<&ToolchainInstance>,
) -> Vec<SettingOverride> {
    let targeted: BTreeSet<&Scope> = scopes.iter().collect();
    let mut overrides: Vec<SettingOverride> = existing
        .iter()
        .filter(|o| !(targeted.contains(&o.scope) && SettingKey::SWITCHED.contains(&o.key())))
        .cloned()
        .collect();

    for scope in scopes {
        overrides.push(SettingOverride::new(
            scope.clone(),
            SettingValue::Version(version.to_string()),
        ));
        overrides.push(SettingOverride::new(
            scope.clone(),
            SettingValue::Home(home.clone()),
        ));
        if let Some(instance) = instance {
            overrides.push(SettingOverride::new(
                scope.clone(),
                SettingValue::Instance(instance.clone()),
            ));
        }
    }

    overrides
}
