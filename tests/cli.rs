//! Drives the `decode` binary itself (stdin -> tagged JSON / error line),
//! covering the CLI round-trip scenario from the core's spec: valid
//! documents exit 0 with BurntSushi tagged JSON, rejected ones exit
//! non-zero with a `<line>:<column>: key error: ...` line on stderr.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_decode(source: &str) -> (bool, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_decode"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn decode binary");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(source.as_bytes())
        .expect("write stdin");

    let output = child.wait_with_output().expect("wait for decode");
    (
        output.status.success(),
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

#[test]
fn valid_document_prints_tagged_json_and_exits_zero() {
    let (ok, stdout, _) = run_decode("[[x]]\nn = 1\n[[x]]\nn = 2\n");
    assert!(ok);
    assert!(stdout.contains("\"type\": \"integer\""));
    assert!(stdout.contains("\"value\": \"1\""));
    assert!(stdout.contains("\"value\": \"2\""));
}

#[test]
fn conflicting_document_exits_nonzero_with_a_located_message() {
    let (ok, _, stderr) = run_decode("a.b = 1\n[a]\n");
    assert!(!ok);
    assert!(stderr.starts_with("2:"));
    assert!(stderr.contains("key error"));
    assert!(stderr.contains("is a closed table"));
}
