// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use crossver::config::Config;
use crossver::config::loader::ConfigLoader;
use crossver::config::types::CompatScheme;

const WORKSPACE: &str = r#"
[session]
project = "root"

[toolchain]
name = "scala"
version = "2.12.18"

[units.root]
base = "."

[units.root.projects.root]
base = "."
aggregate = ["core", "util"]

[units.root.projects.core]
cross_versions = ["2.12.18", "2.13.12", "3.3.1"]

[units.root.projects.core.tasks]
compile = "make compile"
test = "make check"

[units.root.projects.util]
version = "2.13.12"
"#;

// =============================================================================
// Loading from files
// =============================================================================

#[test]
fn config_from_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("crossver.toml");
    std::fs::write(&path, WORKSPACE).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.project_count(), 3);
    assert_eq!(config.toolchain.compat, CompatScheme::Minor);
    assert_eq!(
        config.units["root"].projects["core"].tasks["test"],
        "make check"
    );
}

#[test]
fn config_layers_override_in_order() {
    let temp = tempfile::tempdir().unwrap();
    let base = temp.path().join("crossver.toml");
    let local = temp.path().join("local.toml");
    std::fs::write(&base, WORKSPACE).unwrap();
    std::fs::write(&local, "[toolchain]\ncompat = \"major\"\n\n[engine]\njobs = 8\n").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file_optional(&base)
        .add_toml_file_optional(temp.path().join("missing.toml"))
        .add_toml_file(&local)
        .set_option("engine.jobs=2")
        .unwrap()
        .set_option("engine.dry=true")
        .unwrap();
    assert_eq!(loader.format_loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.toolchain.name, "scala");
    assert_eq!(config.toolchain.compat, CompatScheme::Major);
    assert_eq!(config.engine.jobs, 2);
    assert!(config.engine.dry);
}

#[test]
fn config_rejects_unknown_session_project() {
    let toml = WORKSPACE.replace("project = \"root\"", "project = \"nope\"");
    let err = Config::parse(&toml).unwrap_err();
    assert!(err.to_string().contains("nope"), "{err}");
}

#[test]
fn config_options_listing() {
    let config = Config::parse(WORKSPACE).unwrap();
    let options = config.format_options();
    assert!(
        options
            .iter()
            .any(|line| line.starts_with("toolchain.version") && line.ends_with("= 2.12.18"))
    );
    assert!(options.iter().any(|line| {
        line.starts_with("units.root.projects.core.cross_versions")
            && line.ends_with("= 2.12.18, 2.13.12, 3.3.1")
    }));
}
