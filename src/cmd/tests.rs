// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::cross::{format_plan, plan_steps};
use super::projects::{format_projects, list_projects};
use crate::cli::cross::PlanArgs;
use crate::error::SessionError;
use crate::testing::{Fixture, WORKSPACE};

fn fixture() -> Fixture {
    Fixture::new()
        .project("root", "root", &[], &["core", "{plugins}core"])
        .project("root", "core", &["2.12.18", "2.13.12"], &[])
        .project("plugins", "core", &["2.13.12"], &[])
        .toolchain_version("2.12.18")
        .current("root", "root")
}

fn plan_args(command: &str) -> PlanArgs {
    PlanArgs {
        verbose: false,
        json: false,
        command: command.split(' ').map(ToString::to_string).collect(),
    }
}

#[test]
fn test_plan_lines() {
    let steps = plan_steps(&plan_args("compile"), fixture().config(), Path::new(WORKSPACE)).unwrap();
    insta::assert_snapshot!(format_plan(&steps).join("\n"), @r"
    1. ++2.12.18
    2. all root/compile core/compile
    3. ++2.13.12
    4. all core/compile {plugins}core/compile
    5. crossver-restore-session
    ");
}

#[test]
fn test_plan_requires_session() {
    let config = Fixture::new().project("root", "root", &["2.13.12"], &[]);
    let err = plan_steps(&plan_args("compile"), config.config(), Path::new(WORKSPACE)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SessionError>(),
        Some(SessionError::NoSession)
    ));
}

#[test]
fn test_list_all_projects() {
    let entries = list_projects(fixture().config(), Path::new(WORKSPACE), None).unwrap();
    insta::assert_snapshot!(format_projects(&entries).join("\n"), @r"
      {plugins}core  2.12.18    [2.13.12]
      core           2.12.18    [2.12.18, 2.13.12]
    * root           2.12.18    [2.12.18]
    ");
}

#[test]
fn test_list_projects_by_glob() {
    let config = fixture();
    let by_id = list_projects(config.config(), Path::new(WORKSPACE), Some("co*")).unwrap();
    assert_eq!(by_id.len(), 2);

    let by_unit = list_projects(config.config(), Path::new(WORKSPACE), Some("plugins/*")).unwrap();
    assert_eq!(
        by_unit.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        vec!["{plugins}core"]
    );
    assert!(!by_unit[0].current);
    assert_eq!(by_unit[0].binary_version.as_deref(), Some("2.12"));
}
