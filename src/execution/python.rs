//! Python worker session: one process, one execution scope.

use std::time::Duration;

use tokio::{io::AsyncWriteExt, time::timeout};

use super::{read_frame, ExecutionOutcome, Frame, Request, FRAME_MARKER};
use crate::{
    error::InterpreterError,
    process::{python::start_python, ProcessHandle, WorkerOptions},
};

const BOOTSTRAP: &str = include_str!("bootstrap.py");
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct PythonSession {
    handle: ProcessHandle,
    next_id: u64,
    preloaded: Vec<String>,
    in_flight: bool,
}

impl PythonSession {
    /// Spawns the worker and waits for its ready frame.
    pub async fn start(options: &WorkerOptions) -> Result<Self, InterpreterError> {
        let mut handle = start_python(BOOTSTRAP, FRAME_MARKER, options)?;
        let preloaded = match read_frame(&mut handle.stdout, FRAME_MARKER).await? {
            Some(Frame::Ready { preloaded, missing, version }) => {
                for m in &missing {
                    tracing::warn!(
                        alias = %m.alias,
                        module = %m.module,
                        "preload failed, binding unavailable: {}",
                        m.error
                    );
                }
                tracing::info!(version = %version, preloaded = ?preloaded, "python worker ready");
                preloaded
            }
            Some(other) => {
                return Err(InterpreterError::Protocol(format!(
                    "expected ready frame, got {:?}",
                    other
                )))
            }
            None => return Err(exit_error(&mut handle).await),
        };
        Ok(Self {
            handle,
            next_id: 1,
            preloaded,
            in_flight: false,
        })
    }

    pub fn preloaded(&self) -> &[String] {
        &self.preloaded
    }

    /// A call was started but never read back (its future was dropped).
    /// The worker may still be running it, so its stream can't be trusted.
    pub fn is_poisoned(&self) -> bool {
        self.in_flight
    }

    /// Runs `code` in the session scope and waits for its result frame.
    pub async fn execute(&mut self, code: &str) -> Result<ExecutionOutcome, InterpreterError> {
        let id = self.next_id;
        self.next_id += 1;

        let mut line = serde_json::to_string(&Request { id, code })
            .map_err(|e| InterpreterError::Protocol(e.to_string()))?;
        line.push('\n');

        self.in_flight = true;
        if let Err(e) = self.send(&line).await {
            tracing::debug!(error = %e, "write to worker failed");
            return Err(exit_error(&mut self.handle).await);
        }

        loop {
            match read_frame(&mut self.handle.stdout, FRAME_MARKER).await? {
                Some(Frame::Result { id: Some(got), ok, output, error }) if got == id => {
                    self.in_flight = false;
                    tracing::debug!(id, ok, bytes = output.len(), "execution finished");
                    return Ok(if ok {
                        ExecutionOutcome::Output(output)
                    } else {
                        if !output.is_empty() {
                            tracing::debug!(id, "discarding {} bytes of partial output", output.len());
                        }
                        ExecutionOutcome::Error(error.unwrap_or_else(|| "unknown error".into()))
                    });
                }
                Some(Frame::Result { id: None, error, .. }) => {
                    return Err(InterpreterError::Protocol(
                        error.unwrap_or_else(|| "worker rejected request".into()),
                    ));
                }
                Some(other) => {
                    tracing::debug!(?other, "ignoring unexpected frame");
                }
                None => return Err(exit_error(&mut self.handle).await),
            }
        }
    }

    async fn send(&mut self, line: &str) -> std::io::Result<()> {
        self.handle.stdin.write_all(line.as_bytes()).await?;
        self.handle.stdin.flush().await
    }

    /// Closes the request pipe and gives the worker a moment to exit before killing it.
    pub async fn shutdown(mut self) {
        drop(self.handle.stdin);
        match timeout(SHUTDOWN_GRACE, self.handle.child.wait()).await {
            Ok(Ok(status)) => tracing::debug!(%status, "python worker exited"),
            _ => {
                tracing::debug!("python worker did not exit, killing");
                let _ = self.handle.child.kill().await;
            }
        }
    }
}

async fn exit_error(handle: &mut ProcessHandle) -> InterpreterError {
    match timeout(SHUTDOWN_GRACE, handle.child.wait()).await {
        Ok(Ok(status)) => InterpreterError::Exited(status),
        Ok(Err(e)) => InterpreterError::Io(e),
        Err(_) => InterpreterError::Closed,
    }
}
