//! Dispatches one function call the way the orchestration layer would.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    functions::Registry,
    llm::{FunctionCall, ToolCall},
};

#[derive(Debug, Deserialize)]
struct CallRequest {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Accepts `arguments` as an object or as the JSON string models usually send.
pub fn parse_call(raw: &str) -> Result<ToolCall> {
    let req: CallRequest =
        serde_json::from_str(raw).with_context(|| format!("invalid --tool-call json: {}", raw))?;
    let arguments = match req.arguments {
        Value::String(s) => s,
        v @ Value::Object(_) => v.to_string(),
        Value::Null => bail!("tool call `{}` is missing arguments", req.name),
        other => bail!("tool call arguments must be an object, got {}", other),
    };
    Ok(ToolCall {
        id: req.id,
        r#type: "function".into(),
        function: FunctionCall {
            name: req.name,
            arguments,
        },
    })
}

pub async fn run(raw: &str, registry: &mut Registry) -> Result<()> {
    let call = parse_call(raw)?;
    let answer = registry.dispatch(&call).await;
    registry.shutdown().await;
    let answer = answer?;
    println!("{}", answer.trim_end_matches('\n'));
    Ok(())
}
