// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory project graphs for unit tests.

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::config::types::{CompatScheme, ProjectConfig, UnitConfig};
use crate::graph::BuildGraph;
use crate::session::State;

pub(crate) const WORKSPACE: &str = "/work";

#[derive(Debug, Clone, Default)]
pub(crate) struct Fixture {
    config: Config,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, unit: &str, id: &str) -> &mut ProjectConfig {
        self.config
            .units
            .entry(unit.to_string())
            .or_insert_with(|| UnitConfig {
                base: unit.into(),
                ..UnitConfig::default()
            })
            .projects
            .entry(id.to_string())
            .or_default()
    }

    /// Declares `id` in `unit` with cross versions and aggregate links.
    pub(crate) fn project(mut self, unit: &str, id: &str, versions: &[&str], aggregate: &[&str]) -> Self {
        let project = self.entry(unit, id);
        project.cross_versions = versions.iter().map(ToString::to_string).collect();
        project.aggregate = aggregate.iter().map(ToString::to_string).collect();
        self
    }

    pub(crate) fn pinned(mut self, unit: &str, id: &str, version: &str) -> Self {
        self.entry(unit, id).version = Some(version.to_string());
        self
    }

    pub(crate) fn task(mut self, unit: &str, id: &str, name: &str, command: &str) -> Self {
        self.entry(unit, id)
            .tasks
            .insert(name.to_string(), command.to_string());
        self
    }

    pub(crate) fn toolchain_version(mut self, version: &str) -> Self {
        self.config.toolchain.version = Some(version.to_string());
        self
    }

    pub(crate) const fn compat(mut self, scheme: CompatScheme) -> Self {
        self.config.toolchain.compat = scheme;
        self
    }

    pub(crate) fn current(mut self, unit: &str, id: &str) -> Self {
        self.config.session.unit = unit.to_string();
        self.config.session.project = Some(id.to_string());
        self
    }

    pub(crate) const fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn graph(&self) -> Arc<BuildGraph> {
        Arc::new(BuildGraph::from_config(&self.config, Path::new(WORKSPACE)))
    }

    pub(crate) fn state(&self) -> State {
        self.state_at(Path::new(WORKSPACE))
    }

    /// State with project directories resolved under `root`.
    pub(crate) fn state_at(&self, root: &Path) -> State {
        State::from_config(&self.config, root)
    }
}
