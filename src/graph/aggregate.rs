// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Aggregate closure.
//!
//! ```text
//! root --> [core, util]      resolve_aggregates(root)
//! core --> [util, macros]      = [root, core, util, macros]
//! util --> []                  depth-first, first visit wins
//! ```

use std::collections::BTreeSet;

use super::{BuildQuery, ProjectRef};

/// Returns `start` followed by every project reachable through aggregate
/// links, each exactly once, in depth-first order.
///
/// Unknown projects are emitted but not expanded.
#[must_use]
pub fn resolve_aggregates<Q: BuildQuery + ?Sized>(graph: &Q, start: &ProjectRef) -> Vec<ProjectRef> {
    let mut seen = BTreeSet::new();
    let mut result = Vec::new();
    visit(graph, start, &mut seen, &mut result);
    result
}

fn visit<Q: BuildQuery + ?Sized>(
    graph: &Q,
    project: &ProjectRef,
    seen: &mut BTreeSet<ProjectRef>,
    result: &mut Vec<ProjectRef>,
) {
    if !seen.insert(project.clone()) {
        return;
    }
    result.push(project.clone());

    let Some(links) = graph.aggregates(project) else {
        tracing::debug!(project = %project, "aggregate target not declared, treating as leaf");
        return;
    };
    for link in links {
        visit(graph, link, seen, result);
    }
}
