use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

use anyhow::Result;

fn python_available() -> bool {
    Command::new("python3")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn autods(args: &[&str], stdin: &str) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_autods"))
        .args(args)
        .env("PYTHON_BIN", "python3")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut pipe) = child.stdin.take() {
        pipe.write_all(stdin.as_bytes())?;
    }
    Ok(child.wait_with_output()?)
}

#[test]
fn schema_lists_interpreter() -> Result<()> {
    let out = autods(&["--schema"], "")?;
    assert!(out.status.success());
    let schemas: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(schemas[0]["type"], "function");
    assert_eq!(schemas[0]["function"]["name"], "python_interpreter");
    assert_eq!(
        schemas[0]["function"]["parameters"]["required"],
        serde_json::json!(["code"])
    );
    Ok(())
}

#[test]
fn piped_blocks_share_scope() -> Result<()> {
    if !python_available() {
        println!("python3 not found, skipping");
        return Ok(());
    }
    let input = "x = 41\nprint(x)\n__autods__eof__\nprint(x + 1)\n__autods__eof__\ny = 0\n";
    let out = autods(&["--no-color", "--preload="], input)?;
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout)?;
    assert_eq!(
        stdout,
        "output:\n41\noutput:\n42\n\
         Code executed successfully, but produced no output. Did you forget to print()?\n"
    );
    Ok(())
}

#[test]
fn code_argument_runs_after_stdin() -> Result<()> {
    if !python_available() {
        println!("python3 not found, skipping");
        return Ok(());
    }
    let out = autods(&["--no-color", "--preload=", "print(name.upper())"], "name = 'crew'\n")?;
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout)?, "output:\nCREW\n");
    Ok(())
}

#[test]
fn errors_are_printed_not_raised() -> Result<()> {
    if !python_available() {
        println!("python3 not found, skipping");
        return Ok(());
    }
    let out = autods(&["--no-color", "--preload=", "1 / 0"], "")?;
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout)?,
        "Execution Error: division by zero\n"
    );
    Ok(())
}

#[test]
fn tool_call_with_missing_python_answers() -> Result<()> {
    let call = r#"{"name":"Python Interpreter","arguments":{"code":"print(1)"}}"#;
    let out = autods(&["--python", "autods-no-such-python", "--tool-call", call], "")?;
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout)?;
    assert!(
        stdout.starts_with("Execution Error: failed to start interpreter"),
        "got: {}",
        stdout
    );
    Ok(())
}

#[test]
fn tool_call_with_unknown_tool_fails() -> Result<()> {
    let call = r#"{"name":"web_search","arguments":{"query":"titanic"}}"#;
    let out = autods(&["--tool-call", call], "")?;
    assert!(!out.status.success());
    assert!(String::from_utf8(out.stderr)?.contains("tool not found"));
    Ok(())
}

#[test]
fn nothing_to_run_is_an_error() -> Result<()> {
    let out = autods(&[], "")?;
    assert!(!out.status.success());
    Ok(())
}
