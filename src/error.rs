//! Host-side failures talking to the interpreter worker.
//!
//! None of these reach the tool's caller as errors: the tool turns them into
//! an `Execution Error: ...` answer and discards the worker.

use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("failed to start interpreter `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("interpreter I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("interpreter protocol error: {0}")]
    Protocol(String),
    #[error("interpreter process exited ({0}); session state was lost")]
    Exited(ExitStatus),
    #[error("interpreter closed its output stream")]
    Closed,
}
