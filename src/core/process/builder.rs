// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder.
//!
//! ```text
//! ProcessBuilder
//!  • new / which / shell
//!  • arg / cwd / env / prepend_path / name
//! ```

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use crate::error::ProcessError;

static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Builder for configuring and running a process.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: BTreeMap<OsString, OsString>,
    path_prefix: Vec<PathBuf>,
    name: Option<String>,
}

impl ProcessBuilder {
    /// Creates a builder for `program`, resolved through `PATH` at spawn time.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            path_prefix: Vec::new(),
            name: None,
        }
    }

    /// Resolves `program` via `PATH`. Lookups are cached for the lifetime
    /// of the process.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if the program is not in `PATH`.
    pub fn which(program: &str) -> Result<PathBuf, ProcessError> {
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Ok(path.clone());
            }
        }

        let path = which::which(program).map_err(|_| ProcessError::ExecutableNotFound {
            name: program.to_string(),
        })?;
        exe_cache()
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(program.to_string(), path.clone());
        Ok(path)
    }

    /// Runs `command_line` through `shell` (`cmd /C` or `<shell> -c`).
    pub fn shell(shell: impl AsRef<Path>, command_line: impl Into<String>) -> Self {
        let flag = if is_cmd_shell(shell.as_ref()) { "/C" } else { "-c" };
        Self::new(shell).arg(flag).arg(command_line.into())
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets one environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .insert(key.as_ref().to_os_string(), value.as_ref().to_os_string());
        self
    }

    /// Puts `dir` in front of the inherited `PATH`.
    #[must_use]
    pub fn prepend_path(mut self, dir: impl AsRef<Path>) -> Self {
        self.path_prefix.push(dir.as_ref().to_path_buf());
        self
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[OsString] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) const fn env_vars(&self) -> &BTreeMap<OsString, OsString> {
        &self.env
    }

    pub(super) fn path_prefix(&self) -> &[PathBuf] {
        &self.path_prefix
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

fn is_cmd_shell(shell: &Path) -> bool {
    shell
        .file_stem()
        .and_then(OsStr::to_str)
        .is_some_and(|stem| stem.eq_ignore_ascii_case("cmd"))
}
