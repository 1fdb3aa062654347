// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Declared project graph and its query surface.
//!
//! ```text
//! Config.units --> BuildGraph::from_config()
//!                    ProjectRef { unit, id } --> ProjectNode
//!                    base_dir, aggregate links, cross_versions, version, tasks
//!
//! BuildQuery (read-only)
//!   projects() / aggregates() / cross_versions() / setting() / base_dir()
//!        ^
//!        |  implemented by session::Structure (declared + overrides)
//! ```
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`ProjectRef`] | Build unit id + project id, unique per graph |
//! | [`BuildGraph`] | Declared projects, immutable after load |
//! | [`BuildQuery`] | What the planner and switcher may ask of a graph |
//! | [`aggregate::resolve_aggregates`] | Transitive aggregate closure |
//! | [`catalog::versions_for`] | Declared versions of one project |

pub mod aggregate;
pub mod catalog;


use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::config::types::{CompatScheme, ROOT_UNIT};
use crate::session::{SettingKey, SettingValue};

/// Identifies one project: the build unit it lives in plus its id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProjectRef {
    unit: String,
    id: String,
}

impl ProjectRef {
    #[must_use]
    pub fn new(unit: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            id: id.into(),
        }
    }

    /// Reference into the root build unit.
    #[must_use]
    pub fn root(id: impl Into<String>) -> Self {
        Self::new(ROOT_UNIT, id)
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parses `id` or `{unit}id`, using `default_unit` for the former.
    ///
    /// Returns `None` for an empty id or an unterminated `{`.
    #[must_use]
    pub fn parse(text: &str, default_unit: &str) -> Option<Self> {
        let (unit, id) = match text.strip_prefix('{') {
            Some(rest) => {
                let (unit, id) = rest.split_once('}')?;
                (unit, id)
            }
            None => (default_unit, text),
        };
        if unit.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(unit, id))
    }

    /// Splits `<project>/<rest>` where the project may carry a `{unit}` prefix.
    ///
    /// Unlike the cross grammar this accepts any unit-qualified project text,
    /// so plan steps rendered for non-root units can be routed back.
    #[must_use]
    pub fn split_qualified<'a>(command: &'a str, default_unit: &str) -> Option<(Self, &'a str)> {
        let search_from = if command.starts_with('{') {
            command.find('}')? + 1
        } else {
            0
        };
        let slash = search_from + command[search_from..].find('/')?;
        let head = &command[..slash];
        if head.chars().any(char::is_whitespace) {
            return None;
        }
        Self::parse(head, default_unit).map(|project| (project, &command[slash + 1..]))
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unit == ROOT_UNIT {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{{{}}}{}", self.unit, self.id)
        }
    }
}

/// One declared project.
#[derive(Debug, Clone)]
pub struct ProjectNode {
    pub reference: ProjectRef,
    pub base_dir: PathBuf,
    pub aggregate: Vec<ProjectRef>,
    pub cross_versions: Vec<String>,
    pub version: Option<String>,
    pub tasks: BTreeMap<String, String>,
}

/// The declared build graph. Never mutated by version switches.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    projects: BTreeMap<ProjectRef, ProjectNode>,
    units: Vec<String>,
    default_version: Option<String>,
    toolchain_name: String,
    compat: CompatScheme,
}

impl BuildGraph {
    /// Builds the graph from configuration, resolving directories against `root`.
    ///
    /// Aggregate entries that cannot be parsed are dropped with a warning;
    /// entries naming undeclared projects are kept and treated as leaves.
    #[must_use]
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let mut projects = BTreeMap::new();

        for (unit_id, unit) in &config.units {
            let unit_dir = root.join(&unit.base);
            for (project_id, project) in &unit.projects {
                let reference = ProjectRef::new(unit_id.as_str(), project_id.as_str());
                let base_dir = project
                    .base
                    .as_ref()
                    .map_or_else(|| unit_dir.join(project_id), |base| unit_dir.join(base));

                let aggregate = project
                    .aggregate
                    .iter()
                    .filter_map(|text| {
                        let parsed = ProjectRef::parse(text, unit_id);
                        if parsed.is_none() {
                            tracing::warn!(project = %reference, link = %text, "ignoring malformed aggregate link");
                        }
                        parsed
                    })
                    .collect();

                projects.insert(
                    reference.clone(),
                    ProjectNode {
                        reference,
                        base_dir,
                        aggregate,
                        cross_versions: project.cross_versions.clone(),
                        version: project.version.clone(),
                        tasks: project.tasks.clone(),
                    },
                );
            }
        }

        Self {
            projects,
            units: config.units.keys().cloned().collect(),
            default_version: config.toolchain.version.clone(),
            toolchain_name: config.toolchain.name.clone(),
            compat: config.toolchain.compat,
        }
    }

    #[must_use]
    pub fn node(&self, project: &ProjectRef) -> Option<&ProjectNode> {
        self.projects.get(project)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ProjectNode> {
        self.projects.values()
    }

    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Toolchain version used when neither an override nor a project pin applies.
    #[must_use]
    pub fn default_version(&self) -> Option<&str> {
        self.default_version.as_deref()
    }

    #[must_use]
    pub fn toolchain_name(&self) -> &str {
        &self.toolchain_name
    }

    #[must_use]
    pub const fn compat(&self) -> CompatScheme {
        self.compat
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Read-only questions the planner and switcher ask of a build graph.
pub trait BuildQuery {
    /// Every project in the graph, in a stable order.
    fn projects(&self) -> Vec<ProjectRef>;

    /// Build units of the graph.
    fn units(&self) -> Vec<String>;

    /// Declared aggregate links, or `None` if the project is unknown.
    fn aggregates(&self, project: &ProjectRef) -> Option<&[ProjectRef]>;

    /// Explicitly declared cross versions, or `None` if none were declared.
    fn cross_versions(&self, project: &ProjectRef) -> Option<&[String]>;

    /// Effective value of an overridable setting.
    fn setting(&self, project: &ProjectRef, key: SettingKey) -> Option<SettingValue>;

    /// Project directory.
    fn base_dir(&self, project: &ProjectRef) -> Option<&Path>;

    /// Compatibility scheme used to compare versions.
    fn compat(&self) -> CompatScheme;
}
