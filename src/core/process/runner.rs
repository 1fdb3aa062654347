// crossver: Cross-Version Build Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and output streaming.
//!
//! ```text
//! run(token)
//!     |
//!     v
//! build_command()   args, cwd, env, PATH prefix, piped stdio
//!     |
//!     v
//! spawn() --> reader task per stream (forward to log)
//!     |
//!     v
//! select { child.wait(), token.cancelled() -> kill }
//!     |
//!     v
//! exit code != 0 --> log stderr tail, NonZeroExit
//! ```

use std::collections::VecDeque;
use std::ffi::OsString;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::builder::ProcessBuilder;
use crate::error::{ProcessError, Result};

/// Number of trailing stderr lines repeated when a process fails.
const STDERR_TAIL: usize = 20;

impl ProcessBuilder {
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Full command line, for logs and error messages.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program().display().to_string())
            .chain(self.args_slice().iter().map(|arg| {
                let arg = arg.to_string_lossy();
                if arg.contains(' ') {
                    format!("\"{arg}\"")
                } else {
                    arg.into_owned()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Spawns the process and waits for it, killing it if `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::SpawnFailed` if the process cannot be started,
    /// `ProcessError::Interrupted` if it was cancelled, and
    /// `ProcessError::NonZeroExit` if it exits unsuccessfully.
    pub async fn run(self, token: &CancellationToken) -> Result<()> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Err(ProcessError::Interrupted { command: cmd_line }.into());
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let stdout = child
            .stdout
            .take()
            .map(|stream| spawn_reader(stream, name.clone(), "stdout", 0));
        let stderr = child
            .stderr
            .take()
            .map(|stream| spawn_reader(stream, name.clone(), "stderr", STDERR_TAIL));

        let (status, interrupted) = tokio::select! {
            status = child.wait() => (status?, false),
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, terminating process");
                child.kill().await.ok();
                (child.wait().await?, true)
            }
        };

        if interrupted {
            // Grandchildren may still hold the pipes open.
            stdout.iter().chain(stderr.iter()).for_each(JoinHandle::abort);
            return Err(ProcessError::Interrupted { command: cmd_line }.into());
        }

        if let Some(handle) = stdout {
            handle.await.ok();
        }
        let tail = match stderr {
            Some(handle) => handle.await.unwrap_or_default(),
            None => Vec::new(),
        };

        let code = status.code().unwrap_or(-1);
        if code != 0 {
            if !tail.is_empty() {
                error!(process = %name, stderr = %tail.join("\n"), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code,
            }
            .into());
        }

        trace!(process = %name, "completed");
        Ok(())
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        for (key, value) in self.env_vars() {
            command.env(key, value);
        }
        if let Some(path) = self.joined_path() {
            command.env("PATH", path);
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// `PATH` with the configured prefix, or `None` when there is no prefix.
    fn joined_path(&self) -> Option<OsString> {
        if self.path_prefix().is_empty() {
            return None;
        }
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let dirs = self
            .path_prefix()
            .iter()
            .cloned()
            .chain(std::env::split_paths(&inherited));
        match std::env::join_paths(dirs) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "cannot extend PATH, using inherited value");
                None
            }
        }
    }
}

/// Forwards each line to the log and returns the last `keep` lines.
fn spawn_reader<R>(
    stream: R,
    process: String,
    stream_name: &'static str,
    keep: usize,
) -> JoinHandle<Vec<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        let mut tail = VecDeque::with_capacity(keep);
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    info!(process = %process, stream = stream_name, "{line}");
                    if keep > 0 {
                        if tail.len() == keep {
                            tail.pop_front();
                        }
                        tail.push_back(line);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(process = %process, stream = stream_name, error = %e, "error reading stream");
                    break;
                }
            }
        }
        Vec::from(tail)
    })
}
