mod cli;
mod config;
mod error;
mod execution;
mod functions;
mod handlers;
mod llm;
mod logging;
mod printer;
mod process;
mod tool;

use std::io::{self, Read};

use anyhow::{bail, Result};
use config::Config;
use functions::Registry;
use is_terminal::IsTerminal;
use printer::TextPrinter;
use process::{Preload, WorkerOptions};
use tool::PythonInterpreterTool;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let cfg = Config::load();
    let log_level = args.log_level.clone().unwrap_or_else(|| cfg.log_level());
    logging::init_tracing(&log_level)?;
    tracing::debug!(config = %cfg.config_path.display(), "configuration loaded");

    // CLI flags override config
    let mut options = WorkerOptions::from_config(&cfg)?;
    if let Some(python) = &args.python {
        options.program = python.clone();
    }
    if let Some(spec) = &args.preload {
        options.preload = Preload::parse_list(spec)?;
    }
    if let Some(dir) = &args.workdir {
        options.workdir = Some(dir.clone());
    }

    let color = !args.no_color && io::stdout().is_terminal();
    let printer = if color {
        TextPrinter::new(Some(cfg.default_color()))
    } else {
        TextPrinter::plain()
    };

    if args.schema {
        let registry = Registry::with_interpreter(PythonInterpreterTool::new(options));
        println!("{}", serde_json::to_string_pretty(&registry.schemas())?);
        return Ok(());
    }

    if let Some(raw) = &args.tool_call {
        let mut registry = Registry::with_interpreter(PythonInterpreterTool::new(options));
        return handlers::tool_call::run(raw, &mut registry).await;
    }

    let mut tool = PythonInterpreterTool::new(options);
    if args.repl {
        if !io::stdin().is_terminal() {
            bail!("--repl needs an interactive terminal; pipe code blocks without --repl instead");
        }
        return handlers::repl::run(&mut tool, &printer).await;
    }

    // stdin blocks (separated by __autods__eof__), then files, then CODE
    let mut blocks = Vec::new();
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        blocks.extend(handlers::exec::split_blocks(&buf));
    }
    blocks.extend(handlers::exec::read_files(&args.file)?);
    if let Some(code) = args.code {
        blocks.push(code);
    }
    if blocks.is_empty() {
        bail!("no code given: pass CODE, --file, piped stdin, or use --repl");
    }

    handlers::exec::run(&blocks, &mut tool, &printer).await
}
