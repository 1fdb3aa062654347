// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command loop.
//!
//! ```text
//! run_commands(["cross test"])
//!   pending: [cross test]
//!     |  step: plan, capture snapshot, prepend rendered steps
//!     v
//!   pending: [++2.12.18, all a/test b/test, ++2.13.12 c/test, crossver-restore-session]
//!     |  step: switch_to / engine batch / switch + prepend / restore
//!     v
//!   pending: []          first error: abandon pending, return error
//! ```
//!
//! Dispatch order for one command line:
//!
//! 1. `cross ...`
//! 2. `++...`
//! 3. `crossver-restore-session`
//! 4. `all <p>/<cmd> ...`
//! 5. `<project>/<command>` for a declared project
//! 6. anything else, run on the aggregate closure of the current project


use crate::config::types::ROOT_UNIT;
use crate::cross::parser::{parse_batch, parse_cross, parse_switch};
use crate::cross::planner::{PlanStep, plan};
use crate::cross::switch::switch_to;
use crate::cross::{CrossArgs, RESTORE_COMMAND, SwitchArgs};
use crate::engine::{CommandEngine, Invocation};
use crate::error::{ParseError, Result};
use crate::graph::ProjectRef;
use crate::graph::aggregate::resolve_aggregates;
use crate::session::snapshot::{capture, restore};
use crate::session::State;
use crate::toolchain::ToolchainLoader;

/// Owns the host state and feeds queued commands to the engine.
pub struct Shell<E, L> {
    engine: E,
    loader: L,
    state: State,
}

impl<E: CommandEngine, L: ToolchainLoader> Shell<E, L> {
    #[must_use]
    pub const fn new(engine: E, loader: L, state: State) -> Self {
        Self {
            engine,
            loader,
            state,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> State {
        self.state
    }

    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Queues `commands` and runs until nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns the first failing command's error. Everything still pending,
    /// including a queued restore and its snapshot, is dropped; switches
    /// already applied stay.
    pub async fn run_commands<I>(&mut self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut state = self.state.clone().append_commands(commands);
        while let Some(command) = state.next_command() {
            match self.step(state.clone(), &command).await {
                Ok(next) => state = next,
                Err(e) => {
                    let dropped = state.abandon_pending();
                    tracing::error!(command = %command, dropped, "command failed, abandoning queue");
                    self.state = state;
                    return Err(e);
                }
            }
        }
        self.state = state;
        Ok(())
    }

    async fn step(&self, state: State, command: &str) -> Result<State> {
        let line = command.trim();
        if line.is_empty() {
            return Ok(state);
        }
        tracing::debug!(command = line, "dispatch");

        if let Some(args) = fall_through(parse_cross(line))? {
            return cross(state, &args);
        }
        if let Some(args) = fall_through(parse_switch(line))? {
            return self.switch(state, args);
        }
        if line == RESTORE_COMMAND {
            return restore(state);
        }

        let default_unit = current_unit(&state);
        if let Some(entries) = fall_through(parse_batch(line, &default_unit))? {
            let invocations: Vec<Invocation> = entries
                .into_iter()
                .map(|(project, command)| Invocation::new(project, command))
                .collect();
            self.engine
                .run_batch(state.structure(), &invocations)
                .await?;
            return Ok(state);
        }

        if let Some((project, rest)) = ProjectRef::split_qualified(line, &default_unit)
            && state.structure().graph().node(&project).is_some()
        {
            let invocation = Invocation::new(project, rest);
            self.engine.run(state.structure(), &invocation).await?;
            return Ok(state);
        }

        self.run_on_aggregate(state, line).await
    }

    fn switch(&self, state: State, args: SwitchArgs) -> Result<State> {
        let (state, _report) = switch_to(&args.spec, args.verbose, state, &self.loader)?;
        Ok(match args.command {
            Some(command) => state.prepend_commands([command]),
            None => state,
        })
    }

    async fn run_on_aggregate(&self, state: State, command: &str) -> Result<State> {
        let current = state.session()?.current().clone();
        let structure = state.structure();
        for project in resolve_aggregates(structure, &current) {
            if structure.graph().node(&project).is_none() {
                tracing::debug!(project = %project, "skipping undeclared aggregate member");
                continue;
            }
            let invocation = Invocation::new(project, command);
            self.engine.run(structure, &invocation).await?;
        }
        Ok(state)
    }
}

fn cross(state: State, args: &CrossArgs) -> Result<State> {
    let current = state.session()?.current().clone();
    let steps = plan(state.structure(), &current, &args.command, args.verbose);
    if steps.is_empty() {
        return Ok(state);
    }
    let snapshot = capture(&state);
    Ok(state
        .with_snapshot(snapshot)
        .prepend_commands(steps.iter().map(PlanStep::to_command_line)))
}

/// `Ok(None)` when the grammar does not apply and the next one should be tried.
fn fall_through<T>(parsed: std::result::Result<T, ParseError>) -> Result<Option<T>> {
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fall_through() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn current_unit(state: &State) -> String {
    state.session().map_or_else(
        |_| ROOT_UNIT.to_string(),
        |session| session.current().unit().to_string(),
    )
}
