// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::switch_to;
use crate::config::types::CompatScheme;
use crate::cross::VersionSpec;
use crate::error::{Result, SessionError, ToolchainError};
use crate::graph::ProjectRef;
use crate::session::{Scope, SettingValue, State};
use crate::testing::Fixture;
use crate::toolchain::{DirectoryLoader, ToolchainInstance, ToolchainLoader};

/// Loader reporting a fixed version for any home.
struct FixedLoader(&'static str);

impl ToolchainLoader for FixedLoader {
    fn load(&self, home: &Path) -> Result<ToolchainInstance> {
        Ok(ToolchainInstance::new(home, self.0))
    }
}

fn fixture() -> Fixture {
    Fixture::new()
        .project("root", "root", &[], &["a", "b", "c"])
        .project("root", "a", &["2.12.18", "2.13.12"], &[])
        .project("root", "b", &["2.12.18"], &[])
        .project("root", "c", &["2.13.12"], &[])
        .current("root", "root")
}

fn version_of(state: &State, id: &str) -> Option<String> {
    state
        .structure()
        .resolved(&ProjectRef::root(id))
        .and_then(|settings| settings.version.clone())
}

fn ids(entries: &[super::ProjectVersions]) -> Vec<String> {
    entries.iter().map(|e| e.project.to_string()).collect()
}

#[test]
fn test_named_switch_targets_compatible_projects() {
    let (state, report) =
        switch_to(&VersionSpec::named("2.12.8"), false, fixture().state(), &DirectoryLoader).unwrap();

    assert_eq!(report.binary_version, "2.12");
    assert_eq!(ids(&report.included), ["a", "b"]);
    assert_eq!(ids(&report.excluded), ["c", "root"]);

    assert_eq!(version_of(&state, "a").as_deref(), Some("2.12.8"));
    assert_eq!(version_of(&state, "b").as_deref(), Some("2.12.8"));
    assert_eq!(version_of(&state, "c"), None);
    assert!(
        state
            .overrides()
            .iter()
            .all(|o| matches!(o.scope, Scope::Project(_)))
    );
}

#[test]
fn test_switch_partition_follows_compat_scheme() {
    let major = fixture().compat(CompatScheme::Major).state();
    let (_, report) =
        switch_to(&VersionSpec::named("2.11.0"), false, major, &DirectoryLoader).unwrap();
    assert_eq!(report.binary_version, "2");
    assert_eq!(ids(&report.included), ["a", "b", "c"]);

    let exact = fixture().compat(CompatScheme::Exact).state();
    let (_, report) =
        switch_to(&VersionSpec::named("2.12.8"), false, exact.clone(), &DirectoryLoader).unwrap();
    assert!(report.included.is_empty());
    let (_, report) =
        switch_to(&VersionSpec::named("2.12.18"), false, exact, &DirectoryLoader).unwrap();
    assert_eq!(ids(&report.included), ["a", "b"]);
}

#[test]
fn test_forced_switch_targets_everything() {
    let spec = VersionSpec::Named {
        name: "3.3.1".to_string(),
        force: true,
    };
    let (state, report) = switch_to(&spec, false, fixture().state(), &DirectoryLoader).unwrap();

    assert_eq!(report.included.len(), 4);
    assert!(report.excluded.is_empty());
    for id in ["root", "a", "b", "c"] {
        assert_eq!(version_of(&state, id).as_deref(), Some("3.3.1"), "{id}");
    }

    let scopes: BTreeSet<Scope> = state.overrides().iter().map(|o| o.scope.clone()).collect();
    assert!(scopes.contains(&Scope::Global));
    assert!(scopes.contains(&Scope::Unit("root".to_string())));
}

#[test]
fn test_repeated_switching_keeps_one_override_per_scope_and_key() {
    let mut state = fixture().state();
    for version in ["2.12.8", "2.13.1", "2.12.8"] {
        let spec = VersionSpec::Named {
            name: version.to_string(),
            force: true,
        };
        state = switch_to(&spec, false, state, &DirectoryLoader).unwrap().0;
    }

    let overrides = state.overrides();
    let unique: BTreeSet<_> = overrides.iter().map(|o| (o.scope.clone(), o.key())).collect();
    assert_eq!(unique.len(), overrides.len());
    assert_eq!(version_of(&state, "c").as_deref(), Some("2.12.8"));
}

#[test]
fn test_home_switch_loads_instance() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("scala-2.13.12");
    std::fs::create_dir_all(&home).unwrap();
    let spec = VersionSpec::Home {
        home: home.clone(),
        version_override: None,
        force: false,
    };

    let (state, report) = switch_to(&spec, false, fixture().state(), &DirectoryLoader).unwrap();

    assert_eq!(report.version, "2.13.12");
    assert_eq!(ids(&report.included), ["a", "c"]);
    let settings = state.structure().resolved(&ProjectRef::root("c")).unwrap();
    assert_eq!(settings.home.as_deref(), Some(home.as_path()));
    assert_eq!(
        settings.instance.as_ref().map(ToolchainInstance::version),
        Some("2.13.12")
    );
}

#[test]
fn test_home_switch_version_override_wins() {
    let temp = tempfile::tempdir().unwrap();
    let spec = VersionSpec::Home {
        home: temp.path().to_path_buf(),
        version_override: Some("2.12.20".to_string()),
        force: false,
    };

    let (state, report) = switch_to(&spec, false, fixture().state(), &FixedLoader("9.9.9")).unwrap();

    assert_eq!(report.version, "2.12.20");
    assert_eq!(report.instance.as_ref().map(ToolchainInstance::version), Some("9.9.9"));
    assert_eq!(version_of(&state, "b").as_deref(), Some("2.12.20"));
}

#[test]
fn test_missing_home_is_fatal() {
    let spec = VersionSpec::Home {
        home: PathBuf::from("toolchains/missing-1.0.0"),
        version_override: None,
        force: false,
    };
    let err = switch_to(&spec, false, fixture().state(), &DirectoryLoader).unwrap_err();

    match err.downcast_ref::<ToolchainError>() {
        Some(ToolchainError::HomeNotFound { path }) => {
            assert!(path.ends_with("toolchains/missing-1.0.0"), "{path}");
            assert!(path.starts_with("/work/root/root"), "{path}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_named_switch_clears_previous_home() {
    let temp = tempfile::tempdir().unwrap();
    let home = VersionSpec::Home {
        home: temp.path().to_path_buf(),
        version_override: None,
        force: false,
    };
    let (state, _) = switch_to(&home, false, fixture().state(), &FixedLoader("2.12.18")).unwrap();
    let b = ProjectRef::root("b");
    assert!(state.structure().resolved(&b).unwrap().instance.is_some());

    let (state, _) = switch_to(&VersionSpec::named("2.12.19"), false, state, &DirectoryLoader).unwrap();
    let settings = state.structure().resolved(&b).unwrap();
    assert_eq!(settings.home, None);
    assert_eq!(settings.instance, None);
    assert!(
        !state
            .overrides()
            .iter()
            .any(|o| matches!(o.value, SettingValue::Instance(_)))
    );
}

#[test]
fn test_switch_without_session_fails() {
    let state = Fixture::new().project("root", "a", &["2.12.18"], &[]).state();
    let err = switch_to(&VersionSpec::named("2.12.8"), false, state, &DirectoryLoader).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SessionError>(),
        Some(SessionError::NoSession)
    ));
}

#[test]
fn test_summary_hints_at_verbose_when_projects_are_excluded() {
    let (_, report) =
        switch_to(&VersionSpec::named("2.12.8"), false, fixture().state(), &DirectoryLoader).unwrap();

    let lines = report.summary_lines(&ProjectRef::root("root"), false);
    assert_eq!(
        lines,
        [
            "Setting version to 2.12.8 on 2 projects",
            "Excluded 2 projects, run ++2.12.8 -v for more details",
        ]
    );
}

#[test]
fn test_verbose_summary_marks_current_project() {
    let (_, report) =
        switch_to(&VersionSpec::named("2.13.1"), true, fixture().state(), &DirectoryLoader).unwrap();

    let lines = report.summary_lines(&ProjectRef::root("c"), true);
    insta::assert_snapshot!(lines.join("\n"), @r"
    Setting version to 2.13.1 on 2 projects
    Switching version on:
        a (2.12.18, 2.13.12)
      * c (2.13.12)
    Excluding projects:
        b (2.12.18)
        root ()
    ");
}
