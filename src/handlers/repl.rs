//! Line-based REPL on one interpreter scope.

use std::io::{self, Write};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    execution::ExecutionOutcome,
    printer::TextPrinter,
    tool::{PythonInterpreterTool, DISPLAY_NAME},
};

const PROMPT: &str = ">>> ";
const CONTINUATION: &str = "... ";

/// Collects input lines into complete code blocks.
///
/// A single line runs as soon as it is entered unless it opens a block
/// (ends with `:` or `\`); then lines accumulate until an empty line.
#[derive(Debug, Default)]
pub struct BlockBuffer {
    lines: Vec<String>,
}

impl BlockBuffer {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Feeds one line; returns a block when one is complete.
    pub fn push(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches(['\r', '\n']);
        if self.lines.is_empty() {
            if line.trim().is_empty() {
                return None;
            }
            if !opens_block(line) {
                return Some(format!("{}\n", line));
            }
            self.lines.push(line.to_string());
            return None;
        }
        if line.trim().is_empty() {
            return self.take();
        }
        self.lines.push(line.to_string());
        None
    }

    /// Whatever was buffered, e.g. at EOF.
    pub fn take(&mut self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let mut block = self.lines.join("\n");
        block.push('\n');
        self.lines.clear();
        Some(block)
    }
}

fn opens_block(line: &str) -> bool {
    let t = line.trim_end();
    t.ends_with(':') || t.ends_with('\\')
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{}", text);
    io::stdout().flush()
}

pub async fn run(tool: &mut PythonInterpreterTool, printer: &TextPrinter) -> Result<()> {
    println!("AutoDS {}. Variables persist between inputs; :quit to exit.", DISPLAY_NAME);
    match tool.warm_up().await {
        Ok(()) if !tool.preloaded().is_empty() => println!("Preloaded: {}", tool.preloaded().join(", ")),
        Ok(()) => {}
        Err(e) => printer.print_outcome(&ExecutionOutcome::from(e)),
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = BlockBuffer::default();

    prompt(PROMPT)?;
    while let Some(line) = lines.next_line().await? {
        if buffer.is_empty() && matches!(line.trim(), ":quit" | ":exit") {
            break;
        }
        if let Some(code) = buffer.push(&line) {
            let outcome = tool.run(&code).await;
            printer.print_outcome(&outcome);
        }
        prompt(if buffer.is_empty() { PROMPT } else { CONTINUATION })?;
    }
    if let Some(code) = buffer.take() {
        printer.print_outcome(&tool.run(&code).await);
    }
    println!();
    tool.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_flushes_stdout() {
        assert!(prompt("").is_ok());
    }

    #[test]
    fn single_line_runs_immediately() {
        let mut b = BlockBuffer::default();
        assert_eq!(b.push("x = 1"), Some("x = 1\n".into()));
        assert!(b.is_empty());
    }

    #[test]
    fn blank_line_alone_is_ignored() {
        let mut b = BlockBuffer::default();
        assert_eq!(b.push("   "), None);
        assert!(b.is_empty());
    }

    #[test]
    fn compound_statement_waits_for_blank_line() {
        let mut b = BlockBuffer::default();
        assert_eq!(b.push("for i in range(3):"), None);
        assert_eq!(b.push("    print(i)"), None);
        assert!(!b.is_empty());
        assert_eq!(
            b.push(""),
            Some("for i in range(3):\n    print(i)\n".into())
        );
        assert!(b.is_empty());
    }

    #[test]
    fn take_flushes_pending_block() {
        let mut b = BlockBuffer::default();
        b.push("def f():");
        b.push("    return 1");
        assert_eq!(b.take(), Some("def f():\n    return 1\n".into()));
        assert_eq!(b.take(), None);
    }
}
