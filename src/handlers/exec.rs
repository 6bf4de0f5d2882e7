//! Batch handler: each code block is one call on the same tool instance.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::{printer::TextPrinter, tool::PythonInterpreterTool};

/// Line that separates code blocks in piped stdin.
pub const BLOCK_SEPARATOR: &str = "__autods__eof__";

/// Splits piped input into blocks at separator lines; blank blocks are dropped.
pub fn split_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in input.lines() {
        if line.trim() == BLOCK_SEPARATOR {
            push_block(&mut blocks, &mut current);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_block(&mut blocks, &mut current);
    blocks
}

fn push_block(blocks: &mut Vec<String>, current: &mut String) {
    if !current.trim().is_empty() {
        blocks.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

pub fn read_files(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("reading code file: {}", p.display())))
        .collect()
}

pub async fn run(
    blocks: &[String],
    tool: &mut PythonInterpreterTool,
    printer: &TextPrinter,
) -> Result<()> {
    for (i, code) in blocks.iter().enumerate() {
        tracing::debug!(block = i + 1, total = blocks.len(), "executing block");
        let outcome = tool.run(code).await;
        if outcome.is_error() {
            tracing::info!(block = i + 1, "block answered with an execution error");
        }
        printer.print_outcome(&outcome);
    }
    tool.shutdown().await;
    Ok(())
}
