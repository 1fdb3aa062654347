// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Declared version catalog.

use super::{BuildQuery, ProjectRef};
use crate::session::{SettingKey, SettingValue};

/// Versions a project declares support for.
///
/// `cross_versions` wins when declared; otherwise the project's effective
/// pinned version is returned alone. Neither yields an empty list.
#[must_use]
pub fn versions_for<Q: BuildQuery + ?Sized>(graph: &Q, project: &ProjectRef) -> Vec<String> {
    if let Some(declared) = graph.cross_versions(project)
        && !declared.is_empty()
    {
        return declared.to_vec();
    }

    match graph.setting(project, SettingKey::Version) {
        Some(SettingValue::Version(version)) => vec![version],
        _ => Vec::new(),
    }
}
