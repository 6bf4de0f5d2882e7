//! The "Python Interpreter" tool handed to the coder agent.
//!
//! Every call runs against the same execution scope, so variables, imports and
//! functions defined in one call are visible to the next. The tool always
//! answers with a string: captured output, the empty-output advisory, or an
//! `Execution Error: ...` description the agent can use to fix its code.
//! Nothing here sandboxes the code; it runs with the full rights of the worker
//! process.

use serde::Deserialize;
use serde_json::json;

use crate::{
    error::InterpreterError,
    execution::{python::PythonSession, ExecutionOutcome},
    llm::{FunctionSchema, ToolSchema},
    process::WorkerOptions,
};

pub const DISPLAY_NAME: &str = "Python Interpreter";
pub const FUNCTION_NAME: &str = "python_interpreter";
pub const DESCRIPTION: &str = "A Python execution environment. Use this to analyze data, clean data, \
and perform calculations. IMPORTANT: The environment maintains state. Variables you define in one step \
are available in the next step. ALWAYS use print() to output the results you want to see.";
pub const CODE_DESCRIPTION: &str =
    "The Python code to execute. Must be valid, executable Python code.";

/// Arguments the model sends with a call.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeInput {
    pub code: String,
}

pub struct PythonInterpreterTool {
    options: WorkerOptions,
    session: Option<PythonSession>,
}

impl PythonInterpreterTool {
    /// The worker starts lazily on the first call.
    pub fn new(options: WorkerOptions) -> Self {
        Self {
            options,
            session: None,
        }
    }

    pub fn schema() -> ToolSchema {
        ToolSchema {
            r#type: "function".into(),
            function: FunctionSchema {
                name: FUNCTION_NAME.into(),
                description: Some(DESCRIPTION.into()),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "code": { "type": "string", "description": CODE_DESCRIPTION }
                    },
                    "required": ["code"]
                }),
            },
        }
    }

    /// Runs `code` and renders the answer string for the agent.
    pub async fn execute(&mut self, code: &str) -> String {
        self.run(code).await.into_message()
    }

    /// Like [`execute`](Self::execute) but keeps the outcome tagged.
    pub async fn run(&mut self, code: &str) -> ExecutionOutcome {
        match self.try_run(code).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "interpreter failure, discarding worker");
                self.session = None;
                err.into()
            }
        }
    }

    async fn try_run(&mut self, code: &str) -> Result<ExecutionOutcome, InterpreterError> {
        self.session().await?.execute(code).await
    }

    async fn session(&mut self) -> Result<&mut PythonSession, InterpreterError> {
        let session = match self.session.take() {
            Some(s) if !s.is_poisoned() => s,
            Some(_) => {
                tracing::warn!("previous call was abandoned mid-flight, restarting worker");
                PythonSession::start(&self.options).await?
            }
            None => PythonSession::start(&self.options).await?,
        };
        Ok(self.session.insert(session))
    }

    /// Starts the worker ahead of the first call.
    pub async fn warm_up(&mut self) -> Result<(), InterpreterError> {
        self.session().await.map(|_| ())
    }

    /// Aliases bound in the live worker's scope, if one is running.
    pub fn preloaded(&self) -> &[String] {
        self.session.as_ref().map(|s| s.preloaded()).unwrap_or(&[])
    }

    /// Stops the worker. The scope goes with it; a later call starts fresh.
    pub async fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            session.shutdown().await;
        }
    }
}
