//! Native tools registry and dispatcher.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};

use crate::{
    llm::{ToolCall, ToolSchema},
    tool::{CodeInput, PythonInterpreterTool, FUNCTION_NAME},
};

pub enum NativeTool {
    PythonInterpreter(PythonInterpreterTool),
}

impl NativeTool {
    fn schema(&self) -> ToolSchema {
        match self {
            Self::PythonInterpreter(_) => PythonInterpreterTool::schema(),
        }
    }

    async fn call(&mut self, args_json: &str) -> Result<String> {
        match self {
            Self::PythonInterpreter(tool) => {
                let input = parse_args::<CodeInput>(args_json)?;
                Ok(tool.execute(&input.code).await)
            }
        }
    }

    async fn shutdown(&mut self) {
        match self {
            Self::PythonInterpreter(tool) => tool.shutdown().await,
        }
    }
}

pub struct Registry {
    tools: HashMap<String, NativeTool>,
}

impl Registry {
    pub fn with_interpreter(tool: PythonInterpreterTool) -> Self {
        let mut tools = HashMap::new();
        tools.insert(FUNCTION_NAME.to_string(), NativeTool::PythonInterpreter(tool));
        Self { tools }
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(NativeTool::schema).collect();
        schemas.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        schemas
    }

    /// Runs tool `name` with the model's JSON-encoded arguments.
    ///
    /// Errors here mean the call itself was unusable (unknown tool, bad
    /// arguments). Failures inside the tool come back as `Ok` answers.
    pub async fn execute(&mut self, name: &str, args_json: &str) -> Result<String> {
        let key = normalize_name(name);
        let tool = self
            .tools
            .get_mut(&key)
            .ok_or_else(|| anyhow!("tool not found: {}", name))?;
        tracing::debug!(tool = %key, "dispatching tool call");
        tool.call(args_json).await
    }

    pub async fn dispatch(&mut self, call: &ToolCall) -> Result<String> {
        self.execute(&call.function.name, &call.function.arguments)
            .await
            .with_context(|| match &call.id {
                Some(id) => format!("tool call {} failed", id),
                None => "tool call failed".to_string(),
            })
    }

    pub async fn shutdown(&mut self) {
        for tool in self.tools.values_mut() {
            tool.shutdown().await;
        }
    }
}

/// "Python Interpreter", "python interpreter" and "python_interpreter" all
/// name the same tool.
fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

fn parse_args<T: serde::de::DeserializeOwned>(args_json: &str) -> Result<T> {
    serde_json::from_str(args_json)
        .with_context(|| format!("invalid tool args json: {}", args_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{execution::ERROR_MARKER, llm::FunctionCall, process::WorkerOptions, tool::DISPLAY_NAME};

    fn registry_without_python() -> Registry {
        Registry::with_interpreter(PythonInterpreterTool::new(WorkerOptions {
            program: "autods-no-such-python".into(),
            preload: vec![],
            workdir: None,
        }))
    }

    #[test]
    fn names_normalize_to_function_name() {
        assert_eq!(normalize_name("Python Interpreter"), FUNCTION_NAME);
        assert_eq!(normalize_name(" python-interpreter "), FUNCTION_NAME);
        assert_eq!(normalize_name("python_interpreter"), FUNCTION_NAME);
        assert_eq!(normalize_name("Web Search"), "web_search");
    }

    #[test]
    fn schemas_list_the_interpreter() {
        let registry = registry_without_python();
        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].function.name, FUNCTION_NAME);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let mut registry = registry_without_python();
        let err = registry.execute("web_search", r#"{"q":"x"}"#).await.unwrap_err();
        assert!(err.to_string().contains("tool not found"));
    }

    #[tokio::test]
    async fn malformed_args_are_an_error() {
        let mut registry = registry_without_python();
        assert!(registry.execute(DISPLAY_NAME, "not json").await.is_err());
        assert!(registry.execute(DISPLAY_NAME, r#"{"source":"print(1)"}"#).await.is_err());
    }

    #[tokio::test]
    async fn tool_failures_are_answers() {
        let mut registry = registry_without_python();
        let call = ToolCall {
            id: Some("call_7".into()),
            r#type: "function".into(),
            function: FunctionCall {
                name: DISPLAY_NAME.into(),
                arguments: r#"{"code":"print(1)"}"#.into(),
            },
        };
        let answer = registry.dispatch(&call).await.unwrap();
        assert!(answer.starts_with(ERROR_MARKER), "got: {}", answer);
        registry.shutdown().await;
    }
}
