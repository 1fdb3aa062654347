// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end cross runs with real child processes.
//!
//! Every project appends `$CROSSVER_VERSION` to a file in its directory, so
//! the files record which versions each project was built with, in order.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crossver::cmd::cross::execute_commands;
use crossver::config::Config;
use crossver::error::SessionError;

const WORKSPACE: &str = r#"
[session]
project = "root"

[toolchain]
name = "scala"
version = "2.12.18"

[engine]
shell = "sh"
jobs = 2

[units.root]
base = "."

[units.root.projects.root]
aggregate = ["a", "b"]

[units.root.projects.root.tasks]
compile = "echo $CROSSVER_VERSION >> versions.txt"

[units.root.projects.a]
cross_versions = ["2.12.18", "2.13.12"]

[units.root.projects.a.tasks]
compile = "echo $CROSSVER_VERSION >> versions.txt"
where = "echo \"$CROSSVER_VERSION $CROSSVER_HOME\" > where.txt; fake-scalac > tool.txt"

[units.root.projects.b]
cross_versions = ["2.13.12"]

[units.root.projects.b.tasks]
compile = "echo $CROSSVER_VERSION >> versions.txt"
"#;

struct Workspace {
    _temp: tempfile::TempDir,
    root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().to_path_buf();
        for dir in ["root", "a", "b", "toolchains/scala-2.13.12/bin"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        let scalac = root.join("toolchains/scala-2.13.12/bin/fake-scalac");
        std::fs::write(&scalac, "#!/bin/sh\necho fake scalac 2.13.12\n").unwrap();
        std::fs::set_permissions(&scalac, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self { _temp: temp, root }
    }

    fn lines(&self, project: &str, file: &str) -> Vec<String> {
        read_lines(&self.root.join(project).join(file))
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn config(toml: &str) -> Config {
    Config::parse(toml).unwrap()
}

fn commands(lines: &[&str]) -> Vec<String> {
    lines.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn cross_compile_runs_each_declared_version() {
    let ws = Workspace::new();

    let state = execute_commands(
        &commands(&["cross compile"]),
        &config(WORKSPACE),
        &ws.root,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(ws.lines("root", "versions.txt"), ["2.12.18"]);
    assert_eq!(ws.lines("a", "versions.txt"), ["2.12.18", "2.13.12"]);
    assert_eq!(ws.lines("b", "versions.txt"), ["2.13.12"]);
    assert!(state.overrides().is_empty());
    assert!(!state.has_snapshot());
}

#[tokio::test]
async fn switch_to_home_exports_toolchain() {
    let ws = Workspace::new();

    execute_commands(
        &commands(&["++=../toolchains/scala-2.13.12 a/where"]),
        &config(WORKSPACE),
        &ws.root,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let line = ws.lines("a", "where.txt").concat();
    assert!(line.starts_with("2.13.12 "), "{line}");
    assert!(line.ends_with("toolchains/scala-2.13.12"), "{line}");
    assert_eq!(ws.lines("a", "tool.txt"), ["fake scalac 2.13.12"]);
}

#[tokio::test]
async fn failing_batch_stops_the_run() {
    let ws = Workspace::new();
    let toml = WORKSPACE.replacen(
        "[units.root.projects.b.tasks]\ncompile = \"echo $CROSSVER_VERSION >> versions.txt\"",
        "[units.root.projects.b.tasks]\ncompile = \"exit 3\"",
        1,
    );

    let err = execute_commands(
        &commands(&["cross compile", "root/compile"]),
        &config(&toml),
        &ws.root,
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SessionError>(),
        Some(SessionError::BatchFailed { failed: 1, total: 2 })
    ));
    // The trailing root/compile never ran.
    assert_eq!(ws.lines("root", "versions.txt"), ["2.12.18"]);
    assert_eq!(ws.lines("a", "versions.txt"), ["2.12.18", "2.13.12"]);
}

#[tokio::test]
async fn dry_run_spawns_nothing() {
    let ws = Workspace::new();
    let mut config = config(WORKSPACE);
    config.engine.dry = true;

    execute_commands(
        &commands(&["cross compile", "++2.13.12 b/compile"]),
        &config,
        &ws.root,
        CancellationToken::new(),
    )
    .await
    .unwrap();

    for project in ["root", "a", "b"] {
        assert!(ws.lines(project, "versions.txt").is_empty());
    }
}

#[tokio::test]
async fn missing_home_is_reported() {
    let ws = Workspace::new();

    let err = execute_commands(
        &commands(&["++=../toolchains/scala-3.3.1 compile"]),
        &config(WORKSPACE),
        &ws.root,
        CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("scala-3.3.1"), "{err}");
    assert!(ws.lines("root", "versions.txt").is_empty());
}
