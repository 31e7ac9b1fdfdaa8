//! Runs the ytdj CLI as a cancellable child process, streaming its stdout

use crate::error::LaunchError;
use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const LINE_BUFFER: usize = 64;

/// A child process whose stdout arrives line by line on [`Self::lines`]
pub struct RunningDownload {
    pub lines: mpsc::Receiver<String>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<ExitStatus, LaunchError>>,
}

impl RunningDownload {
    /// Ask the reader task to kill the child and everything it started.
    /// Idempotent.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Wait for the child to exit. Unread lines are discarded. Returns
    /// [`LaunchError::Cancelled`] if it was killed through [`Self::cancel`].
    pub async fn wait(self) -> Result<ExitStatus, LaunchError> {
        drop(self.lines);
        // Keep the cancel sender alive so the reader doesn't see a hangup
        let _cancel = self.cancel;
        self.task.await?
    }
}

/// Spawn `program args...` with stdout piped and stderr inherited.
///
/// `envs` are added to the inherited environment. On unix the child leads
/// its own process group so cancellation reaches its descendants too.
pub fn spawn(
    program: &Path,
    args: &[String],
    envs: &[(String, OsString)],
) -> Result<RunningDownload, LaunchError> {
    info!("Launching {} {}", program.display(), args.join(" "));

    let mut command = Command::new(program);
    command
        .args(args)
        .envs(envs.iter().map(|(key, value)| (key, value)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
        program: program.display().to_string(),
        source,
    })?;

    let stdout = child.stdout.take().ok_or(LaunchError::NoStdout)?;
    let (line_tx, line_rx) = mpsc::channel(LINE_BUFFER);
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut segments = BufReader::new(stdout).split(b'\n');
        let mut cancel_open = true;
        // At most one line waits for channel capacity; reading pauses meanwhile
        let mut pending: Option<String> = None;

        loop {
            tokio::select! {
                biased;

                request = &mut cancel_rx, if cancel_open => {
                    if request.is_ok() {
                        debug!("Cancelling child process");
                        terminate(&mut child).await?;
                        return Err(LaunchError::Cancelled);
                    }
                    cancel_open = false;
                }
                permit = line_tx.reserve(), if pending.is_some() => {
                    let line = pending.take();
                    // Receiver gone: drop the line and keep draining so the child never blocks
                    if let (Ok(permit), Some(line)) = (permit, line) {
                        permit.send(line);
                    }
                }
                segment = segments.next_segment(), if pending.is_none() => match segment? {
                    Some(bytes) => {
                        let line = String::from_utf8_lossy(&bytes).trim_end_matches('\r').to_string();
                        pending = Some(line);
                    }
                    None => break,
                },
            }
        }

        let status = child.wait().await?;
        debug!("Child exited with {}", status);
        Ok::<_, LaunchError>(status)
    });

    Ok(RunningDownload {
        lines: line_rx,
        cancel: Some(cancel_tx),
        task,
    })
}

/// Kill the child's whole process group, then the child itself
async fn terminate(child: &mut Child) -> Result<(), LaunchError> {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!("killpg({}) failed: {}", pid, e);
        }
    }

    child.kill().await?;
    Ok(())
}
