//! Execution engine: worker protocol and result types.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::InterpreterError;

pub mod python;

pub const OUTPUT_MARKER: &str = "output:\n";
pub const ERROR_MARKER: &str = "Execution Error: ";
pub const EMPTY_OUTPUT_ADVISORY: &str =
    "Code executed successfully, but produced no output. Did you forget to print()?";

/// Prefix of every protocol line the worker writes to its stdout.
pub const FRAME_MARKER: &str = "\u{1e}autods-frame ";

/// What one call produced. Exactly one of the two per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Captured stdout, possibly empty.
    Output(String),
    /// Description of whatever went wrong.
    Error(String),
}

impl ExecutionOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The string handed back to the calling agent.
    pub fn into_message(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output(out) if out.is_empty() => f.write_str(EMPTY_OUTPUT_ADVISORY),
            Self::Output(out) => write!(f, "{}{}", OUTPUT_MARKER, out),
            Self::Error(msg) => write!(f, "{}{}", ERROR_MARKER, msg),
        }
    }
}

impl From<InterpreterError> for ExecutionOutcome {
    fn from(err: InterpreterError) -> Self {
        Self::Error(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub id: u64,
    pub code: &'a str,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MissingModule {
    pub alias: String,
    pub module: String,
    pub error: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum Frame {
    Ready {
        #[serde(default)]
        preloaded: Vec<String>,
        #[serde(default)]
        missing: Vec<MissingModule>,
        #[serde(default)]
        version: String,
    },
    Result {
        id: Option<u64>,
        ok: bool,
        #[serde(default)]
        output: String,
        error: Option<String>,
    },
}

/// Reads lines until one carries `marker`; `None` at EOF.
///
/// Text without the marker is something user code wrote straight to the raw
/// stream, in any encoding. It is logged and skipped.
pub(crate) async fn read_frame<R>(
    reader: &mut R,
    marker: &str,
) -> Result<Option<Frame>, InterpreterError>
where
    R: AsyncBufRead + Unpin,
{
    let marker = marker.as_bytes();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            return Ok(None);
        }
        let Some(pos) = find_marker(&line, marker) else {
            log_stray(&line);
            continue;
        };
        log_stray(&line[..pos]);
        let payload = std::str::from_utf8(&line[pos + marker.len()..])
            .map_err(|e| InterpreterError::Protocol(format!("frame is not UTF-8: {}", e)))?
            .trim_end();
        let frame = serde_json::from_str(payload)
            .map_err(|e| InterpreterError::Protocol(format!("bad frame `{}`: {}", payload, e)))?;
        return Ok(Some(frame));
    }
}

fn find_marker(line: &[u8], marker: &[u8]) -> Option<usize> {
    line.windows(marker.len()).position(|w| w == marker)
}

fn log_stray(bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_end();
    if !text.is_empty() {
        tracing::debug!("stray worker output: {}", text);
    }
}
