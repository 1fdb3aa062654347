// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Engine that runs project commands as child processes.

use anyhow::Context;
use futures_util::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::{
    CommandEngine, ENV_BINARY_VERSION, ENV_HOME, ENV_OUTPUT_DIR, ENV_VERSION, Invocation,
};
use crate::config::types::EngineConfig;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{Result, SessionError};
use crate::session::Structure;

/// Runs `<project>/<command>` in the project directory.
///
/// The first word of the command is looked up in the project's tasks; the
/// task's command line replaces it and the remaining words are appended.
/// Anything else is handed to the configured shell verbatim.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    shell: PathBuf,
    jobs: usize,
    semaphore: Arc<Semaphore>,
    dry: bool,
    cancel_token: CancellationToken,
}

impl ProcessEngine {
    /// Creates an engine; `jobs == 0` uses the available parallelism.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if the configured shell
    /// cannot be found in `PATH`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let shell = ProcessBuilder::which(&config.shell)?;
        let jobs = if config.jobs == 0 {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(4)
        } else {
            config.jobs
        };
        tracing::trace!(shell = %shell.display(), "resolved shell");
        Ok(Self {
            shell,
            jobs,
            semaphore: Arc::new(Semaphore::new(jobs)),
            dry: config.dry,
            cancel_token: CancellationToken::new(),
        })
    }

    /// Shares a cancellation token, typically cancelled on Ctrl-C.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry
    }

    /// Maximum number of batch invocations running at once.
    #[must_use]
    pub const fn jobs(&self) -> usize {
        self.jobs
    }

    /// Builds the process for `invocation` without running it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProjectNotFound` if the project is not declared.
    pub fn prepare(&self, structure: &Structure, invocation: &Invocation) -> Result<ProcessBuilder> {
        let project = &invocation.project;
        let node = structure
            .graph()
            .node(project)
            .ok_or_else(|| SessionError::ProjectNotFound {
                project: project.to_string(),
            })?;

        let command = invocation.command.trim();
        let (head, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(head, rest)| (head, rest.trim_start()));
        let line = match node.tasks.get(head) {
            Some(task) if rest.is_empty() => task.clone(),
            Some(task) => format!("{task} {rest}"),
            None => command.to_string(),
        };

        let mut builder = ProcessBuilder::shell(&self.shell, line)
            .cwd(&node.base_dir)
            .name(project.to_string());

        if let Some(settings) = structure.resolved(project) {
            if let Some(version) = &settings.version {
                builder = builder.env(ENV_VERSION, version);
            }
            if let Some(binary) = &settings.binary_version {
                builder = builder.env(ENV_BINARY_VERSION, binary);
            }
            if let Some(home) = &settings.home {
                builder = builder.env(ENV_HOME, home);
            }
            if let Some(output_dir) = &settings.output_dir {
                builder = builder.env(ENV_OUTPUT_DIR, output_dir);
            }
            if let Some(instance) = &settings.instance {
                builder = builder.prepend_path(instance.bin_dir());
            }
        }

        Ok(builder)
    }

    async fn execute(&self, invocation: &Invocation, builder: ProcessBuilder) -> Result<()> {
        if self.dry {
            tracing::info!(project = %invocation.project, cmd = %builder.command_line(), "dry run");
            return Ok(());
        }
        tracing::info!(invocation = %invocation, "running");
        builder
            .run(&self.cancel_token)
            .await
            .with_context(|| format!("'{invocation}' failed"))?;
        Ok(())
    }
}

impl CommandEngine for ProcessEngine {
    fn run<'a>(
        &'a self,
        structure: &'a Structure,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let builder = self.prepare(structure, invocation)?;
            self.execute(invocation, builder).await
        })
    }

    fn run_batch<'a>(
        &'a self,
        structure: &'a Structure,
        invocations: &'a [Invocation],
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let prepared = invocations
                .iter()
                .map(|invocation| -> Result<(Invocation, ProcessBuilder)> {
                    Ok((invocation.clone(), self.prepare(structure, invocation)?))
                })
                .collect::<Result<Vec<_>>>()?;
            let total = prepared.len();
            tracing::debug!(total, "starting batch");

            let mut set = JoinSet::new();
            for (invocation, builder) in prepared {
                let engine = self.clone();
                set.spawn(async move {
                    let _permit = Arc::clone(&engine.semaphore)
                        .acquire_owned()
                        .await
                        .context("batch semaphore closed")?;
                    engine.execute(&invocation, builder).await
                });
            }

            let mut errors = Vec::new();
            while let Some(result) = set.join_next().await {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => errors.push(e),
                    Err(e) => errors.push(anyhow::anyhow!("batch invocation panicked: {e}")),
                }
            }

            let failed = errors.len();
            let mut errors = errors.into_iter();
            let Some(first) = errors.next() else {
                return Ok(());
            };
            for (i, e) in errors.enumerate() {
                tracing::error!(error = %e, index = i + 2, "additional batch failure");
            }
            Err(first.context(SessionError::BatchFailed { failed, total }))
        })
    }
}
