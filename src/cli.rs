use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "autods", about = "Stateful Python interpreter tool for the AutoDS crew", version)]
#[command(group(ArgGroup::new("mode").args(["repl", "schema", "tool_call"]).multiple(false)))]
pub struct Cli {
    /// Code to run. Piped stdin blocks and --file run first, on the same scope.
    #[arg(value_name = "CODE")]
    pub code: Option<String>,

    /// Run a file as one call. Can be used multiple times.
    #[arg(short = 'f', long = "file", action = clap::ArgAction::Append)]
    pub file: Vec<PathBuf>,

    /// Start an interactive session on one scope.
    #[arg(long)]
    pub repl: bool,

    /// Print the function-calling schema of every tool as JSON.
    #[arg(long)]
    pub schema: bool,

    /// Dispatch a tool call: {"name": ..., "arguments": {...} or "<json>"}.
    #[arg(long = "tool-call", value_name = "JSON")]
    pub tool_call: Option<String>,

    /// Python executable for the worker (overrides PYTHON_BIN).
    #[arg(long)]
    pub python: Option<String>,

    /// Modules bound before the first call, e.g. "pd=pandas,np=numpy" (overrides PRELOAD_MODULES).
    #[arg(long)]
    pub preload: Option<String>,

    /// Working directory of the worker (overrides INTERP_WORKDIR).
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Log filter, e.g. "debug" (overrides LOG_LEVEL; RUST_LOG wins over both).
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// Disable coloured output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
