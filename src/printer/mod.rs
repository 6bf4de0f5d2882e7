//! Printers: tool answers on stdout, optionally coloured.

use owo_colors::OwoColorize;

use crate::execution::{ExecutionOutcome, EMPTY_OUTPUT_ADVISORY, OUTPUT_MARKER};

pub struct TextPrinter {
    pub color: Option<String>,
}

impl TextPrinter {
    pub fn new(color: Option<String>) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: None }
    }

    fn paint(&self, text: &str) -> String {
        match self.color.as_deref() {
            Some("green") => text.green().to_string(),
            Some("cyan") => text.cyan().to_string(),
            Some("magenta") => text.magenta().to_string(),
            Some("yellow") => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }

    pub fn print_outcome(&self, outcome: &ExecutionOutcome) {
        print!("{}", self.render(outcome));
    }

    /// The answer string, newline-terminated, with the marker coloured.
    pub fn render(&self, outcome: &ExecutionOutcome) -> String {
        let mut text = match (outcome, self.color.is_some()) {
            (_, false) => outcome.to_string(),
            (ExecutionOutcome::Output(out), true) if out.is_empty() => {
                EMPTY_OUTPUT_ADVISORY.yellow().to_string()
            }
            (ExecutionOutcome::Output(out), true) => {
                format!("{}\n{}", self.paint(OUTPUT_MARKER.trim_end()), out)
            }
            (ExecutionOutcome::Error(_), true) => outcome.to_string().red().to_string(),
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_render_matches_answer() {
        let p = TextPrinter::plain();
        assert_eq!(p.render(&ExecutionOutcome::Output("1\n".into())), "output:\n1\n");
        assert_eq!(
            p.render(&ExecutionOutcome::Error("boom".into())),
            "Execution Error: boom\n"
        );
        assert_eq!(
            p.render(&ExecutionOutcome::Output(String::new())),
            format!("{}\n", EMPTY_OUTPUT_ADVISORY)
        );
    }

    #[test]
    fn coloured_render_keeps_body() {
        let p = TextPrinter::new(Some("green".into()));
        let text = p.render(&ExecutionOutcome::Output("abc".into()));
        assert!(text.contains("output:"));
        assert!(text.ends_with("abc\n"));
    }
}
