// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            CrossverError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+------+
//!   |      |      |       |      |      |      |
//!   v      v      v       v      v      v      v
//! Bail  Parse  Session Toolchain Cfg  Proc  Io/Other
//!        Box    Box      Box     Box   Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Parse     NoMatch, MissingCommand, MissingVersion, Unqualified
//!   Session   NoSession, ProjectNotFound, BatchFailed
//!   Toolchain HomeNotFound, NoVersion
//!   Config    ParseError, MissingKey, InvalidValue
//!   Process   SpawnFailed, NonZeroExit, Interrupted
//!
//! All variants boxed => CrossverError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`CrossverError`].
pub type CrossverResult<T> = std::result::Result<T, CrossverError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum CrossverError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Command text could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] Box<ParseError>),

    /// Session or project lookup failed.
    #[error("session error: {0}")]
    Session(#[from] Box<SessionError>),

    /// Toolchain resolution failed.
    #[error("toolchain error: {0}")]
    Toolchain(#[from] Box<ToolchainError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`CrossverError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> CrossverError {
    CrossverError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for CrossverError {
                fn from(err: $error) -> Self {
                    CrossverError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ParseError => Parse,
    SessionError => Session,
    ToolchainError => Toolchain,
    ConfigError => Config,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Parse Errors ---

/// Command grammar errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not belong to this grammar; try the next one.
    #[error("input does not match the '{grammar}' grammar")]
    NoMatch { grammar: &'static str },

    /// Keyword matched but the mandatory trailing command is missing.
    #[error("'{keyword}' expects a command to run")]
    MissingCommand { keyword: &'static str },

    /// Switch marker matched but no version token follows.
    #[error("expected a version after '{marker}'")]
    MissingVersion { marker: &'static str },

    /// Version token is malformed (e.g. only `!` or an empty home path).
    #[error("invalid version token '{token}': {message}")]
    InvalidVersion { token: String, message: String },

    /// A batch entry lacks its `<project>/` qualifier.
    #[error("batch entry '{token}' is not of the form <project>/<command>")]
    Unqualified { token: String },
}

impl ParseError {
    /// Returns whether the dispatcher should try the next grammar.
    #[must_use]
    pub const fn is_fall_through(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

// --- Session Errors ---

/// Session and project graph errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No current project is loaded.
    #[error("no project loaded; set [session] project in crossver.toml")]
    NoSession,

    /// A referenced project does not exist in the graph.
    #[error("project not found: {project}")]
    ProjectNotFound { project: String },

    /// One or more invocations of a batch failed.
    #[error("{failed} of {total} batch invocations failed")]
    BatchFailed { failed: usize, total: usize },
}

// --- Toolchain Errors ---

/// Toolchain resolution errors.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// Toolchain home directory does not exist.
    #[error("toolchain home {path} does not exist")]
    HomeNotFound { path: String },

    /// No version could be determined for the toolchain home.
    #[error("cannot determine toolchain version for {path}: no VERSION file and no version suffix")]
    NoVersion { path: String },

    /// The `VERSION` file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadVersion {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Configuration file not found.
    #[error("config file not found: {0}")]
    NotFound(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process was interrupted before completion.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },
}
