// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session overlay: ad hoc setting overrides above the declared graph.
//!
//! ```text
//!  BuildGraph (declared, Arc)      Overrides (Arc<[SettingOverride]>)
//!            \                       /
//!             +--> Structure::load <+       resolution per project:
//!                    |                        Project scope
//!                    v                        > Unit scope
//!           ResolvedSettings per project      > Global scope
//!           version, binary_version,          > project `version`
//!           home, instance, output_dir        > toolchain.version
//! ```
//!
//! Override lists are immutable values; every change produces a new list and
//! a reloaded [`Structure`], threaded through [`State`].

pub mod snapshot;
pub mod state;

#[cfg(test)]
mod tests;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::types::CompatScheme;
use crate::graph::{BuildGraph, BuildQuery, ProjectRef};
use crate::toolchain::ToolchainInstance;
use crate::toolchain::version::binary_version;

pub use snapshot::Snapshot;
pub use state::State;

/// Where an override applies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Scope {
    Global,
    Unit(String),
    Project(ProjectRef),
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => write!(f, "*"),
            Self::Unit(unit) => write!(f, "{{{unit}}}"),
            Self::Project(project) => write!(f, "{project}"),
        }
    }
}

/// Settings a version switch may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SettingKey {
    Version,
    Home,
    Instance,
}

impl SettingKey {
    /// Every key a version switch owns.
    pub const SWITCHED: [Self; 3] = [Self::Version, Self::Home, Self::Instance];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Home => "home",
            Self::Instance => "instance",
        }
    }
}

/// Value of an overridable setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SettingValue {
    Version(String),
    /// `None` explicitly clears an inherited home.
    Home(Option<PathBuf>),
    Instance(ToolchainInstance),
}

impl SettingValue {
    #[must_use]
    pub const fn key(&self) -> SettingKey {
        match self {
            Self::Version(_) => SettingKey::Version,
            Self::Home(_) => SettingKey::Home,
            Self::Instance(_) => SettingKey::Instance,
        }
    }
}

/// One ad hoc override: `scope / key := value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingOverride {
    pub scope: Scope,
    pub value: SettingValue,
}

impl SettingOverride {
    #[must_use]
    pub const fn new(scope: Scope, value: SettingValue) -> Self {
        Self { scope, value }
    }

    #[must_use]
    pub const fn key(&self) -> SettingKey {
        self.value.key()
    }
}

impl std::fmt::Display for SettingOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            SettingValue::Version(v) => v.clone(),
            SettingValue::Home(Some(path)) => path.display().to_string(),
            SettingValue::Home(None) => "<none>".to_string(),
            SettingValue::Instance(instance) => instance.to_string(),
        };
        write!(f, "{} / {} := {value}", self.scope, self.key().name())
    }
}

/// Immutable, shareable override list.
pub type Overrides = Arc<[SettingOverride]>;

/// Empty override list.
#[must_use]
pub fn no_overrides() -> Overrides {
    Arc::from(Vec::new())
}

/// The loaded session: which project is current plus the ad hoc overrides.
#[derive(Debug, Clone)]
pub struct Session {
    current: ProjectRef,
    overrides: Overrides,
}

impl Session {
    #[must_use]
    pub fn new(current: ProjectRef) -> Self {
        Self {
            current,
            overrides: no_overrides(),
        }
    }

    #[must_use]
    pub const fn current(&self) -> &ProjectRef {
        &self.current
    }

    #[must_use]
    pub const fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Settings of one project after applying overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedSettings {
    pub version: Option<String>,
    pub binary_version: Option<String>,
    pub home: Option<PathBuf>,
    pub instance: Option<ToolchainInstance>,
    pub output_dir: Option<PathBuf>,
}

/// Declared graph plus overrides, with every derived value computed.
#[derive(Debug, Clone)]
pub struct Structure {
    graph: Arc<BuildGraph>,
    overrides: Overrides,
    resolved: BTreeMap<ProjectRef, ResolvedSettings>,
}

impl Structure {
    /// Recomputes every project's settings from the graph and overrides.
    #[must_use]
    pub fn load(graph: Arc<BuildGraph>, overrides: Overrides) -> Self {
        let resolved = graph
            .nodes()
            .map(|node| {
                let settings = resolve_project(&graph, &overrides, &node.reference, &node.base_dir);
                (node.reference.clone(), settings)
            })
            .collect();
        Self {
            graph,
            overrides,
            resolved,
        }
    }

    #[must_use]
    pub const fn graph(&self) -> &Arc<BuildGraph> {
        &self.graph
    }

    #[must_use]
    pub const fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    #[must_use]
    pub fn resolved(&self, project: &ProjectRef) -> Option<&ResolvedSettings> {
        self.resolved.get(project)
    }
}

fn resolve_project(
    graph: &BuildGraph,
    overrides: &[SettingOverride],
    project: &ProjectRef,
    base_dir: &Path,
) -> ResolvedSettings {
    let lookup = |key| find_override(overrides, project, key);

    let version = match lookup(SettingKey::Version) {
        Some(SettingValue::Version(v)) => Some(v.clone()),
        _ => graph
            .node(project)
            .and_then(|node| node.version.clone())
            .or_else(|| graph.default_version().map(str::to_string)),
    };
    let home = match lookup(SettingKey::Home) {
        Some(SettingValue::Home(home)) => home.clone(),
        _ => None,
    };
    let instance = match lookup(SettingKey::Instance) {
        Some(SettingValue::Instance(instance)) => Some(instance.clone()),
        _ => None,
    };

    let binary_version = version
        .as_deref()
        .map(|v| binary_version(v, graph.compat()));
    let output_dir = binary_version.as_ref().map(|binary| {
        base_dir
            .join("target")
            .join(format!("{}-{binary}", graph.toolchain_name()))
    });

    ResolvedSettings {
        version,
        binary_version,
        home,
        instance,
        output_dir,
    }
}

/// Most specific override for `key`; the last one wins within a scope.
fn find_override<'a>(
    overrides: &'a [SettingOverride],
    project: &ProjectRef,
    key: SettingKey,
) -> Option<&'a SettingValue> {
    let scopes = [
        Scope::Project(project.clone()),
        Scope::Unit(project.unit().to_string()),
        Scope::Global,
    ];
    scopes.into_iter().find_map(|scope| {
        overrides
            .iter()
            .rev()
            .find(|o| o.scope == scope && o.key() == key)
            .map(|o| &o.value)
    })
}

impl BuildQuery for Structure {
    fn projects(&self) -> Vec<ProjectRef> {
        self.resolved.keys().cloned().collect()
    }

    fn units(&self) -> Vec<String> {
        self.graph.units().to_vec()
    }

    fn aggregates(&self, project: &ProjectRef) -> Option<&[ProjectRef]> {
        self.graph.node(project).map(|node| node.aggregate.as_slice())
    }

    fn cross_versions(&self, project: &ProjectRef) -> Option<&[String]> {
        self.graph
            .node(project)
            .map(|node| node.cross_versions.as_slice())
            .filter(|versions| !versions.is_empty())
    }

    fn setting(&self, project: &ProjectRef, key: SettingKey) -> Option<SettingValue> {
        let resolved = self.resolved.get(project)?;
        match key {
            SettingKey::Version => resolved.version.clone().map(SettingValue::Version),
            SettingKey::Home => Some(SettingValue::Home(resolved.home.clone())),
            SettingKey::Instance => resolved.instance.clone().map(SettingValue::Instance),
        }
    }

    fn base_dir(&self, project: &ProjectRef) -> Option<&Path> {
        self.graph.node(project).map(|node| node.base_dir.as_path())
    }

    fn compat(&self) -> CompatScheme {
        self.graph.compat()
    }
}
