//! Interpreter process management (startup/IO/health).

use std::path::PathBuf;

use anyhow::{bail, Result};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, ChildStderr, ChildStdin, ChildStdout},
};

use crate::config::Config;

pub mod python;

pub struct ProcessHandle {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: BufReader<ChildStdout>,
}

/// A module bound into the execution scope before the first call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preload {
    pub alias: String,
    pub module: String,
}

impl Preload {
    /// Parses `pd=pandas, np=numpy`. A bare `json` binds `json=json`.
    pub fn parse_list(spec: &str) -> Result<Vec<Preload>> {
        let mut out = Vec::new();
        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (alias, module) = match item.split_once('=') {
                Some((a, m)) => (a.trim(), m.trim()),
                None => (item, item),
            };
            if alias.is_empty() || module.is_empty() {
                bail!("invalid preload entry `{}` (expected alias=module)", item);
            }
            out.push(Preload {
                alias: alias.to_string(),
                module: module.to_string(),
            });
        }
        Ok(out)
    }

    pub fn to_spec(list: &[Preload]) -> String {
        list.iter()
            .map(|p| format!("{}={}", p.alias, p.module))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub program: String,
    pub preload: Vec<Preload>,
    pub workdir: Option<PathBuf>,
}

impl WorkerOptions {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            program: cfg.python_bin(),
            preload: Preload::parse_list(&cfg.preload_modules())?,
            workdir: cfg.workdir(),
        })
    }
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            program: "python3".into(),
            preload: vec![Preload {
                alias: "pd".into(),
                module: "pandas".into(),
            }],
            workdir: None,
        }
    }
}

/// Drains the worker's stderr into the log until the pipe closes.
pub(crate) fn forward_stderr(stderr: ChildStderr, pid: Option<u32>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            tracing::debug!(pid = ?pid, "worker stderr: {}", line);
        }
    });
}
