// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cross plan construction.
//!
//! ```text
//! targets:  A (2.12.18)   B (2.12.18)   C (2.13.12)       command "compile"
//!              \             /              |
//! groups:     2.12.18: [A, B]          2.13.12: [C]        first-encountered order
//!                  |                        |
//! steps:    ++2.12.18                ++2.13.12 C/compile   single project: fused
//!           all A/compile B/compile
//!                                   crossver-restore-session
//! ```
//!
//! A multi-project group whose command contains whitespace cannot use the
//! batch form and gets one `Run` per project instead.


use serde::Serialize;

use super::parser::{Qualified, parse_project_qualified};
use super::{BATCH_KEYWORD, RESTORE_COMMAND, SwitchArgs, VersionSpec};
use crate::graph::aggregate::resolve_aggregates;
use crate::graph::catalog::versions_for;
use crate::graph::{BuildQuery, ProjectRef};

/// One step of a cross plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PlanStep {
    /// Switch version, optionally running one command right after.
    Switch {
        spec: VersionSpec,
        verbose: bool,
        then: Option<String>,
    },
    Run {
        project: ProjectRef,
        command: String,
    },
    /// One engine request fanning `command` out over several projects.
    BatchRun {
        projects: Vec<ProjectRef>,
        command: String,
    },
    Restore,
}

impl PlanStep {
    /// Renders the step as a command line the shell understands.
    #[must_use]
    pub fn to_command_line(&self) -> String {
        match self {
            Self::Switch {
                spec,
                verbose,
                then,
            } => SwitchArgs {
                spec: spec.clone(),
                verbose: *verbose,
                command: then.clone(),
            }
            .to_command_line(),
            Self::Run { project, command } => format!("{project}/{command}"),
            Self::BatchRun { projects, command } => std::iter::once(BATCH_KEYWORD.to_string())
                .chain(projects.iter().map(|project| format!("{project}/{command}")))
                .collect::<Vec<_>>()
                .join(" "),
            Self::Restore => RESTORE_COMMAND.to_string(),
        }
    }
}

impl std::fmt::Display for PlanStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_command_line())
    }
}

/// Projects sharing one version, in first-encountered order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VersionGroup {
    version: String,
    projects: Vec<ProjectRef>,
}

/// Builds the ordered plan for `cross [-v] <command>` run from `current`.
///
/// Returns an empty plan, without a restore step, when no target declares
/// any version.
#[must_use]
pub fn plan<Q: BuildQuery + ?Sized>(
    graph: &Q,
    current: &ProjectRef,
    command: &str,
    verbose: bool,
) -> Vec<PlanStep> {
    let (targets, remainder) = match parse_project_qualified(command) {
        Qualified::Project { project, remainder } => {
            let targets: Vec<ProjectRef> = graph
                .projects()
                .into_iter()
                .filter(|candidate| candidate.id() == project)
                .collect();
            (targets, remainder)
        }
        Qualified::Plain(command) => (resolve_aggregates(graph, current), command),
    };

    let groups = group_by_version(graph, &targets);
    if groups.is_empty() {
        tracing::info!(command, "no versions declared for any target project, nothing to do");
        return Vec::new();
    }
    tracing::debug!(
        targets = targets.len(),
        groups = groups.len(),
        "planned cross run"
    );

    let batchable = !remainder.chars().any(char::is_whitespace);
    let mut steps = Vec::with_capacity(groups.len() * 2 + 1);

    for group in groups {
        let spec = VersionSpec::named(group.version);
        match group.projects.as_slice() {
            [single] => steps.push(PlanStep::Switch {
                spec,
                verbose,
                then: Some(format!("{single}/{remainder}")),
            }),
            projects => {
                steps.push(PlanStep::Switch {
                    spec,
                    verbose,
                    then: None,
                });
                if batchable {
                    steps.push(PlanStep::BatchRun {
                        projects: projects.to_vec(),
                        command: remainder.to_string(),
                    });
                } else {
                    steps.extend(projects.iter().map(|project| PlanStep::Run {
                        project: project.clone(),
                        command: remainder.to_string(),
                    }));
                }
            }
        }
    }

    steps.push(PlanStep::Restore);
    steps
}

fn group_by_version<Q: BuildQuery + ?Sized>(
    graph: &Q,
    targets: &[ProjectRef],
) -> Vec<VersionGroup> {
    let mut groups: Vec<VersionGroup> = Vec::new();

    for project in targets {
        for version in versions_for(graph, project) {
            match groups.iter_mut().find(|group| group.version == version) {
                Some(group) => {
                    if !group.projects.contains(project) {
                        group.projects.push(project.clone());
                    }
                }
                None => groups.push(VersionGroup {
                    version,
                    projects: vec![project.clone()],
                }),
            }
        }
    }

    groups
}
