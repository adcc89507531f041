// Copyright 2025 nnbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Subprocess execution with merged output capture.
//!
//! Commands are spawned directly from an argument vector, never through a
//! shell. Standard output and standard error are read concurrently and
//! appended to a single buffer in the order the chunks arrive, so callers
//! see one combined stream.
//!
//! When a timeout is given and elapses, the child is killed and reaped
//! before [`ProcessError::Timeout`] is returned. Children are also spawned
//! with `kill_on_drop` so an abandoned future never leaks a process.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::debug;

const READ_CHUNK: usize = 8 * 1024;

/// Errors that can occur while running a subprocess.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The process could not be started.
    #[error("failed to start process: {0}")]
    Spawn(#[source] io::Error),

    /// Reading the output or waiting on the process failed.
    #[error("failed to collect process output: {0}")]
    Io(#[source] io::Error),

    /// The process did not finish in time and was killed.
    #[error("process timed out after {0:?}")]
    Timeout(Duration),

    /// The process exited unsuccessfully.
    #[error("process exited with {status}")]
    Exit {
        /// Exit status reported by the OS.
        status: ExitStatus,
        /// Merged output captured before exit.
        output: Vec<u8>,
    },
}

/// Result type for process operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Run `program` with `args`, returning the merged stdout/stderr bytes.
///
/// `None` means no timeout.
pub async fn run_merged(
    program: &Path,
    args: &[OsString],
    timeout: Option<Duration>,
) -> Result<Vec<u8>> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(ProcessError::Spawn)?;

    debug!(program = %program.display(), pid = ?child.id(), "Spawned process");

    let collected = match timeout {
        Some(limit) => match tokio::time::timeout(limit, collect(&mut child)).await {
            Ok(collected) => collected,
            Err(_) => {
                // The pipes were dropped with the collect future; reap the child.
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(ProcessError::Timeout(limit));
            }
        },
        None => collect(&mut child).await,
    };

    let (status, output) = collected.map_err(ProcessError::Io)?;
    debug!(%status, bytes = output.len(), "Process finished");

    if !status.success() {
        return Err(ProcessError::Exit { status, output });
    }
    Ok(output)
}

async fn collect(child: &mut Child) -> io::Result<(ExitStatus, Vec<u8>)> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stderr not captured"))?;

    let mut output = Vec::new();
    let mut out_buf = [0u8; READ_CHUNK];
    let mut err_buf = [0u8; READ_CHUNK];
    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open {
        tokio::select! {
            n = stdout.read(&mut out_buf), if out_open => {
                match n? {
                    0 => out_open = false,
                    n => output.extend_from_slice(&out_buf[..n]),
                }
            }
            n = stderr.read(&mut err_buf), if err_open => {
                match n? {
                    0 => err_open = false,
                    n => output.extend_from_slice(&err_buf[..n]),
                }
            }
        }
    }

    let status = child.wait().await?;
    Ok((status, output))
}
