// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Capture and restore of the ad hoc override list around a cross run.
//!
//! ```text
//! cross ...  --> capture(state) --> state.with_snapshot(s)
//!   ++v1 ...; ++v2 ...; crossver-restore-session
//!                                      |
//!                                      v
//!                 restore(state): take snapshot, reload  (or no-op)
//! ```

use std::sync::Arc;

use super::{Overrides, State};
use crate::error::Result;

/// Override list captured at one point in time. Consumed by one restore.
#[derive(Debug, Clone)]
pub struct Snapshot {
    overrides: Overrides,
}

impl Snapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Records the current override list. The declared graph is not captured.
#[must_use]
pub fn capture(state: &State) -> Snapshot {
    Snapshot {
        overrides: state.overrides(),
    }
}

/// Puts back the captured override list, if this run captured one.
///
/// # Errors
///
/// Returns `SessionError::NoSession` if a snapshot exists but the session
/// has been unloaded since.
pub fn restore(mut state: State) -> Result<State> {
    let Some(snapshot) = state.take_snapshot() else {
        tracing::debug!("no captured session to restore");
        return Ok(state);
    };
    tracing::debug!(overrides = snapshot.len(), "restoring captured session");
    state.with_overrides(Arc::clone(&snapshot.overrides))
}
