// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::version::{binary_version, is_compatible};
use super::{DirectoryLoader, ToolchainLoader, VERSION_FILE};
use crate::config::types::CompatScheme;
use crate::error::ToolchainError;

#[test]
fn test_minor_scheme_drops_patch() {
    assert_eq!(binary_version("2.12.18", CompatScheme::Minor), "2.12");
    assert_eq!(binary_version("2.12", CompatScheme::Minor), "2.12");
    assert_eq!(binary_version("3.3.1", CompatScheme::Minor), "3.3");
}

#[test]
fn test_prerelease_is_kept_whole() {
    assert_eq!(
        binary_version("2.13.0-RC1", CompatScheme::Minor),
        "2.13.0-RC1"
    );
    assert_eq!(
        binary_version("2.13.0-RC1", CompatScheme::Major),
        "2.13.0-RC1"
    );
}

#[test]
fn test_major_scheme_keeps_first_segment() {
    assert_eq!(binary_version("17.0.2", CompatScheme::Major), "17");
    assert_eq!(binary_version("17", CompatScheme::Major), "17");
}

#[test]
fn test_non_numeric_versions_pass_through() {
    assert_eq!(binary_version("nightly", CompatScheme::Minor), "nightly");
    assert_eq!(binary_version("3", CompatScheme::Minor), "3");
    assert_eq!(binary_version("2.x.1", CompatScheme::Minor), "2.x.1");
}

#[test]
fn test_compatibility_follows_scheme() {
    assert!(is_compatible("2.12.8", "2.12.18", CompatScheme::Minor));
    assert!(!is_compatible("2.12.8", "2.13.1", CompatScheme::Minor));
    assert!(is_compatible("2.12.8", "2.13.1", CompatScheme::Major));
    assert!(!is_compatible("2.12.8", "2.12.18", CompatScheme::Exact));
}

#[test]
fn test_version_from_dir_name() {
    let cases = [
        ("/opt/scala-2.13.12", Some("2.13.12")),
        ("/opt/jdk_17.0.2", Some("17.0.2")),
        ("/opt/scala-v3.3.1", Some("3.3.1")),
        ("/opt/scala-2.13.0-RC1", Some("2.13.0-RC1")),
        ("/opt/scala", None),
        ("/opt/jdk-17", None),
    ];
    for (path, expected) in cases {
        assert_eq!(
            DirectoryLoader::version_from_dir_name(Path::new(path)).as_deref(),
            expected,
            "{path}"
        );
    }
}

#[test]
fn test_loader_prefers_version_file() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("scala-2.12.1");
    std::fs::create_dir_all(home.join("bin")).unwrap();
    std::fs::write(home.join(VERSION_FILE), "2.12.18\n").unwrap();

    let instance = DirectoryLoader.load(&home).unwrap();
    assert_eq!(instance.version(), "2.12.18");
    assert_eq!(instance.home(), home.as_path());
    assert_eq!(instance.bin_dir(), home.join("bin").as_path());
}

#[test]
fn test_loader_falls_back_to_dir_name() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("toolchain-3.3.1");
    std::fs::create_dir_all(&home).unwrap();

    let instance = DirectoryLoader.load(&home).unwrap();
    assert_eq!(instance.version(), "3.3.1");
    assert_eq!(instance.bin_dir(), home.as_path());
}

#[test]
fn test_loader_without_version_fails() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("toolchain");
    std::fs::create_dir_all(&home).unwrap();

    let err = DirectoryLoader.load(&home).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ToolchainError>(),
        Some(ToolchainError::NoVersion { .. })
    ));
}

#[test]
fn test_loader_missing_home_fails() {
    let temp = tempfile::tempdir().unwrap();
    let err = DirectoryLoader
        .load(&temp.path().join("absent-1.0.0"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ToolchainError>(),
        Some(ToolchainError::HomeNotFound { .. })
    ));
}
