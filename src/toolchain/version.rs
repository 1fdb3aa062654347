// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Binary-compatible version identifiers.
//!
//! ```text
//! scheme   2.12.18   2.12   2.13.0-RC1   3.3.1   nightly
//! minor    2.12      2.12   2.13.0-RC1   3.3     nightly
//! major    2         2      2.13.0-RC1   3       nightly
//! exact    2.12.18   2.12   2.13.0-RC1   3.3.1   nightly
//! ```
//!
//! Pre-releases are only compatible with themselves.

use crate::config::types::CompatScheme;

/// Normalizes `version` so that interchangeable versions compare equal.
#[must_use]
pub fn binary_version(version: &str, scheme: CompatScheme) -> String {
    if scheme == CompatScheme::Exact || version.contains('-') {
        return version.to_string();
    }

    let segments: Vec<&str> = version.split('.').collect();
    let numeric = |s: &&str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match scheme {
        CompatScheme::Minor if segments.len() >= 2 && segments[..2].iter().all(numeric) => {
            format!("{}.{}", segments[0], segments[1])
        }
        CompatScheme::Major if segments.first().is_some_and(|s| numeric(s)) => {
            segments[0].to_string()
        }
        _ => version.to_string(),
    }
}

/// Whether two versions are interchangeable under `scheme`.
#[must_use]
pub fn is_compatible(a: &str, b: &str, scheme: CompatScheme) -> bool {
    binary_version(a, scheme) == binary_version(b, scheme)
}
