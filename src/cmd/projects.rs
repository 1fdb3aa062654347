// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Projects command implementation for crossver.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use wax::{Glob, Program};

use crate::cli::projects::ProjectsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::graph::catalog::versions_for;
use crate::graph::{BuildQuery, ProjectRef};
use crate::session::State;

/// One row of the project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectEntry {
    pub project: ProjectRef,
    pub name: String,
    pub versions: Vec<String>,
    pub version: Option<String>,
    pub binary_version: Option<String>,
    pub current: bool,
}

/// Lists declared projects, optionally filtered by a glob.
///
/// A pattern containing `/` is matched against `<unit>/<id>`, anything else
/// against the project id.
///
/// # Errors
///
/// Returns an error if the pattern is not a valid glob.
pub fn list_projects(config: &Config, root: &Path, pattern: Option<&str>) -> Result<Vec<ProjectEntry>> {
    let glob = pattern
        .map(|pattern| {
            Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))
        })
        .transpose()?;

    let state = State::from_config(config, root);
    let structure = state.structure();
    let current = state.session().ok().map(|session| session.current().clone());

    let entries = structure
        .projects()
        .into_iter()
        .filter(|project| {
            glob.as_ref().is_none_or(|glob| {
                let pattern = pattern.unwrap_or_default();
                if pattern.contains('/') {
                    glob.is_match(format!("{}/{}", project.unit(), project.id()).as_str())
                } else {
                    glob.is_match(project.id())
                }
            })
        })
        .map(|project| {
            let resolved = structure.resolved(&project).cloned().unwrap_or_default();
            ProjectEntry {
                name: project.to_string(),
                versions: versions_for(structure, &project),
                version: resolved.version,
                binary_version: resolved.binary_version,
                current: current.as_ref() == Some(&project),
                project,
            }
        })
        .collect();
    Ok(entries)
}

/// Aligned text rows: marker, name, effective version, declared versions.
#[must_use]
pub fn format_projects(entries: &[ProjectEntry]) -> Vec<String> {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|entry| {
            let marker = if entry.current { '*' } else { ' ' };
            let version = entry.version.as_deref().unwrap_or("-");
            format!(
                "{marker} {:<width$}  {version:<10} [{}]",
                entry.name,
                entry.versions.join(", ")
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

/// Main handler for the projects command.
///
/// # Errors
///
/// Returns an error if the pattern is invalid or JSON encoding fails.
pub fn run_projects_command(args: &ProjectsArgs, config: &Config, root: &Path) -> Result<()> {
    let entries = list_projects(config, root, args.pattern.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No projects found");
    }
    for line in format_projects(&entries) {
        println!("{line}");
    }
    Ok(())
}
