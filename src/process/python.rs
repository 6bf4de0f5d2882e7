//! Python worker process bootstrap and I/O glue.

use std::process::Stdio;

use tokio::{
    io::BufReader,
    process::{Child, Command},
};

use super::{forward_stderr, Preload, ProcessHandle, WorkerOptions};
use crate::error::InterpreterError;

/// Spawns `<program> -u -c <bootstrap> <frame_marker> <preload_spec>`.
pub fn start_python(
    bootstrap: &str,
    frame_marker: &str,
    options: &WorkerOptions,
) -> Result<ProcessHandle, InterpreterError> {
    let mut cmd = Command::new(&options.program);
    cmd.arg("-u") // unbuffered
        .arg("-c")
        .arg(bootstrap)
        .arg(frame_marker)
        .arg(Preload::to_spec(&options.preload))
        .env("PYTHONIOENCODING", "utf-8")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &options.workdir {
        cmd.current_dir(dir);
    }

    let mut child: Child = cmd.spawn().map_err(|source| InterpreterError::Spawn {
        program: options.program.clone(),
        source,
    })?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| InterpreterError::Protocol("no stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| InterpreterError::Protocol("no stdout".into()))?;
    if let Some(stderr) = child.stderr.take() {
        forward_stderr(stderr, child.id());
    }

    tracing::debug!(program = %options.program, pid = ?child.id(), "started python worker");
    Ok(ProcessHandle {
        child,
        stdin,
        stdout: BufReader::new(stdout),
    })
}
