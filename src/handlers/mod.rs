pub mod exec;
pub mod repl;
pub mod tool_call;
