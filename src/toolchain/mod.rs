// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Toolchain instances loaded from a home directory.
//!
//! ```text
//! ++=/opt/scala-2.13.12
//!        |
//!        v
//! ToolchainLoader::load(home)
//!   DirectoryLoader: home/VERSION  or  "<name>-<version>" dir suffix
//!        |
//!        v
//! ToolchainInstance { home, version, bin_dir }
//! ```

pub mod version;

#[cfg(test)]
mod tests;

use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Result, ToolchainError};

/// A toolchain bound to one version, rooted at a home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainInstance {
    home: PathBuf,
    version: String,
    bin_dir: PathBuf,
}

impl ToolchainInstance {
    #[must_use]
    pub fn new(home: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        let home = home.into();
        let bin = home.join("bin");
        let bin_dir = if bin.is_dir() { bin } else { home.clone() };
        Self {
            home,
            version: version.into(),
            bin_dir,
        }
    }

    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Version reported by the toolchain itself.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory to put in front of `PATH` when running commands.
    #[must_use]
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }
}

impl std::fmt::Display for ToolchainInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.version, self.home.display())
    }
}

/// Turns a home directory into a usable toolchain instance.
pub trait ToolchainLoader {
    /// Loads the toolchain at `home`, which is known to exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not a usable toolchain.
    fn load(&self, home: &Path) -> Result<ToolchainInstance>;
}

/// Name of the file a toolchain home may carry its version in.
pub const VERSION_FILE: &str = "VERSION";

/// Loader that reads `VERSION` or infers the version from the directory name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryLoader;

fn dir_version_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_]v?(\d+(?:\.\d+)+(?:-[0-9A-Za-z.]+)?)$").ok())
        .as_ref()
}

impl DirectoryLoader {
    /// Version embedded in a directory name such as `scala-2.13.12`.
    #[must_use]
    pub fn version_from_dir_name(home: &Path) -> Option<String> {
        let name = home.file_name()?.to_str()?;
        dir_version_regex()?
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl ToolchainLoader for DirectoryLoader {
    fn load(&self, home: &Path) -> Result<ToolchainInstance> {
        if !home.is_dir() {
            return Err(ToolchainError::HomeNotFound {
                path: home.display().to_string(),
            }
            .into());
        }

        let version_file = home.join(VERSION_FILE);
        if version_file.is_file() {
            let content =
                std::fs::read_to_string(&version_file).map_err(|source| ToolchainError::ReadVersion {
                    path: version_file.display().to_string(),
                    source,
                })?;
            let version = content.lines().next().unwrap_or_default().trim();
            if !version.is_empty() {
                tracing::debug!(home = %home.display(), version, "read toolchain version file");
                return Ok(ToolchainInstance::new(home, version));
            }
        }

        Self::version_from_dir_name(home)
            .map(|version| ToolchainInstance::new(home, version))
            .ok_or_else(|| {
                ToolchainError::NoVersion {
                    path: home.display().to_string(),
                }
                .into()
            })
    }
}
