// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::snapshot::{capture, restore};
use super::{Scope, SettingOverride, SettingValue, State};
use crate::cross::VersionSpec;
use crate::cross::switch::switch_to;
use crate::error::SessionError;
use crate::graph::ProjectRef;
use crate::testing::Fixture;
use crate::toolchain::DirectoryLoader;

fn fixture() -> Fixture {
    Fixture::new()
        .toolchain_version("2.13.12")
        .project("root", "root", &[], &["core"])
        .project("root", "core", &["2.12.18", "2.13.12"], &[])
        .pinned("root", "util", "2.12.18")
        .project("plugins", "ext", &[], &[])
        .current("root", "root")
}

fn version(state: &State, project: &ProjectRef) -> Option<String> {
    state.structure().resolved(project)?.version.clone()
}

fn with(state: State, overrides: Vec<SettingOverride>) -> State {
    state.with_overrides(Arc::from(overrides)).unwrap()
}

#[test]
fn test_declared_resolution() {
    let state = fixture().state();
    assert_eq!(version(&state, &ProjectRef::root("util")).as_deref(), Some("2.12.18"));
    assert_eq!(version(&state, &ProjectRef::root("core")).as_deref(), Some("2.13.12"));

    let core = state.structure().resolved(&ProjectRef::root("core")).unwrap();
    assert_eq!(core.binary_version.as_deref(), Some("2.13"));
    assert_eq!(
        core.output_dir.as_deref(),
        Some(Path::new("/work/root/core/target/toolchain-2.13"))
    );
}

#[test]
fn test_scope_precedence() {
    let ext = ProjectRef::new("plugins", "ext");
    let state = with(
        fixture().state(),
        vec![
            SettingOverride::new(Scope::Global, SettingValue::Version("3.0.0".into())),
            SettingOverride::new(
                Scope::Unit("plugins".into()),
                SettingValue::Version("3.1.0".into()),
            ),
            SettingOverride::new(
                Scope::Project(ProjectRef::root("util")),
                SettingValue::Version("3.2.0".into()),
            ),
        ],
    );

    assert_eq!(version(&state, &ProjectRef::root("util")).as_deref(), Some("3.2.0"));
    assert_eq!(version(&state, &ext).as_deref(), Some("3.1.0"));
    assert_eq!(version(&state, &ProjectRef::root("core")).as_deref(), Some("3.0.0"));
}

#[test]
fn test_last_override_wins_within_scope() {
    let scope = Scope::Project(ProjectRef::root("core"));
    let state = with(
        fixture().state(),
        vec![
            SettingOverride::new(scope.clone(), SettingValue::Version("2.12.1".into())),
            SettingOverride::new(scope, SettingValue::Version("2.12.2".into())),
        ],
    );
    assert_eq!(version(&state, &ProjectRef::root("core")).as_deref(), Some("2.12.2"));
}

#[test]
fn test_home_override_may_clear() {
    let scope = Scope::Project(ProjectRef::root("core"));
    let state = with(
        fixture().state(),
        vec![
            SettingOverride::new(Scope::Global, SettingValue::Home(Some(PathBuf::from("/opt/t")))),
            SettingOverride::new(scope, SettingValue::Home(None)),
        ],
    );
    let structure = state.structure();
    assert_eq!(structure.resolved(&ProjectRef::root("core")).unwrap().home, None);
    assert_eq!(
        structure.resolved(&ProjectRef::root("util")).unwrap().home.as_deref(),
        Some(Path::new("/opt/t"))
    );
}

#[test]
fn test_capture_then_restore_is_identity() {
    let state = with(
        fixture().state(),
        vec![SettingOverride::new(
            Scope::Unit("plugins".into()),
            SettingValue::Version("3.1.0".into()),
        )],
    );
    let before: Vec<_> = state.overrides().to_vec();
    let snapshot = capture(&state);
    assert_eq!(snapshot.len(), 1);

    let state = state.with_snapshot(snapshot);
    let forced = VersionSpec::Named {
        name: "2.11.12".to_string(),
        force: true,
    };
    let (state, _) = switch_to(&forced, false, state, &DirectoryLoader).unwrap();
    assert_ne!(state.overrides().to_vec(), before);

    let state = restore(state).unwrap();
    assert_eq!(state.overrides().to_vec(), before);
    assert!(!state.has_snapshot());
    assert_eq!(
        version(&state, &ProjectRef::new("plugins", "ext")).as_deref(),
        Some("3.1.0")
    );
    assert_eq!(version(&state, &ProjectRef::root("util")).as_deref(), Some("2.12.18"));
}

#[test]
fn test_restore_without_capture_is_noop() {
    let state = with(
        fixture().state(),
        vec![SettingOverride::new(Scope::Global, SettingValue::Version("3.0.0".into()))],
    );
    let before = state.overrides().to_vec();
    let state = restore(state).unwrap();
    assert_eq!(state.overrides().to_vec(), before);
}

#[test]
fn test_snapshot_is_consumed_once() {
    let state = fixture().state();
    let state = state.with_snapshot(capture(&fixture().state()));
    let state = restore(state).unwrap();
    assert!(!state.has_snapshot());

    let state = with(
        state,
        vec![SettingOverride::new(Scope::Global, SettingValue::Version("3.0.0".into()))],
    );
    let state = restore(state).unwrap();
    assert_eq!(state.overrides().len(), 1);
}

#[test]
fn test_no_session() {
    let state = Fixture::new().project("root", "a", &[], &[]).state();
    assert!(matches!(
        state.session().unwrap_err().downcast_ref::<SessionError>(),
        Some(SessionError::NoSession)
    ));
    assert!(state.overrides().is_empty());
    assert!(
        state
            .with_overrides(Arc::from(Vec::new()))
            .unwrap_err()
            .downcast_ref::<SessionError>()
            .is_some()
    );
}

#[test]
fn test_pending_queue_order() {
    let state = fixture().state();
    let snapshot = capture(&state);
    let mut state = state
        .with_snapshot(snapshot)
        .append_commands(["c".to_string()])
        .prepend_commands(["a".to_string(), "b".to_string()]);

    assert_eq!(state.pending().len(), 3);
    assert_eq!(state.next_command().as_deref(), Some("a"));
    assert_eq!(state.abandon_pending(), 2);
    assert_eq!(state.next_command(), None);
    assert!(!state.has_snapshot());
}

#[test]
fn test_override_display() {
    let value = SettingOverride::new(
        Scope::Unit("plugins".into()),
        SettingValue::Version("3.1.0".into()),
    );
    assert_eq!(value.to_string(), "{plugins} / version := 3.1.0");
    let cleared = SettingOverride::new(Scope::Global, SettingValue::Home(None));
    assert_eq!(cleared.to_string(), "* / home := <none>");
}
