// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host state threaded through every command.
//!
//! ```text
//! State { structure, session?, pending commands, snapshot? }
//!   step(State) --> State     (no shared mutable cell)
//! ```

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use super::{Overrides, Session, Snapshot, Structure, no_overrides};
use crate::config::Config;
use crate::config::types::ROOT_UNIT;
use crate::error::{Result, SessionError};
use crate::graph::{BuildGraph, ProjectRef};

/// Everything a command may read or replace.
#[derive(Debug, Clone)]
pub struct State {
    structure: Arc<Structure>,
    session: Option<Session>,
    pending: VecDeque<String>,
    snapshot: Option<Snapshot>,
}

impl State {
    /// Creates a state over `graph`, with a session when `current` is given.
    #[must_use]
    pub fn new(graph: Arc<BuildGraph>, current: Option<ProjectRef>) -> Self {
        Self {
            structure: Arc::new(Structure::load(graph, no_overrides())),
            session: current.map(Session::new),
            pending: VecDeque::new(),
            snapshot: None,
        }
    }

    /// Loads the graph described by `config`, resolving paths against `root`.
    #[must_use]
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let graph = Arc::new(BuildGraph::from_config(config, root));
        let current = config.session.project.as_ref().map(|project| {
            let unit = if config.session.unit.is_empty() {
                ROOT_UNIT
            } else {
                config.session.unit.as_str()
            };
            ProjectRef::new(unit, project.as_str())
        });
        Self::new(graph, current)
    }

    #[must_use]
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Returns the loaded session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSession` when no current project is loaded.
    pub fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| SessionError::NoSession.into())
    }

    /// Current override list (empty without a session).
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        self.session
            .as_ref()
            .map_or_else(no_overrides, |session| Arc::clone(session.overrides()))
    }

    /// Replaces the override list and reloads the structure.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSession` when no current project is loaded.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self> {
        let session = self.session.take().ok_or(SessionError::NoSession)?;
        let graph = Arc::clone(self.structure.graph());
        self.structure = Arc::new(Structure::load(graph, Arc::clone(&overrides)));
        self.session = Some(session.with_overrides(overrides));
        Ok(self)
    }

    /// Queues commands to run before anything already pending.
    #[must_use]
    pub fn prepend_commands<I>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: DoubleEndedIterator,
    {
        for command in commands.into_iter().rev() {
            self.pending.push_front(command);
        }
        self
    }

    /// Queues commands after everything already pending.
    #[must_use]
    pub fn append_commands<I>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.pending.extend(commands);
        self
    }

    /// Removes and returns the next pending command.
    pub fn next_command(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    #[must_use]
    pub const fn pending(&self) -> &VecDeque<String> {
        &self.pending
    }

    /// Drops every pending command and the snapshot their restore would
    /// have consumed.
    pub fn abandon_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.snapshot = None;
        dropped
    }

    /// Stores the snapshot a later restore will consume.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    #[must_use]
    pub const fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub(super) const fn take_snapshot(&mut self) -> Option<Snapshot> {
        self.snapshot.take()
    }
}
