//! CLI integration tests
//!
//! These run the built binary end to end: bootstrap, create, initiate,
//! dispatch and read back, all inside one process.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn sc_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sc-cli"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_run_search_with_fixed_ok() {
    // Scenario: Search command with one query parameter
    // When: `sc-cli run --class Search --param foo --json`
    // Then: the command finishes with result code ok

    let output = sc_cli(&["run", "--class", "Search", "--param", "foo", "--json"]);
    let report = stdout_json(&output);

    assert_eq!(report["state"], "finished");
    assert_eq!(report["result_code"], "ok");
    assert_eq!(report["handled"], 1);
    assert_eq!(report["unhandled"], 0);
    assert!(report["result"].as_u64().is_some());
    assert_ne!(report["result"], report["command"]);
}

#[test]
fn test_run_publishes_requested_code() {
    let output = sc_cli(&["run", "--result", "sc_result_error_not_found", "--json"]);
    let report = stdout_json(&output);

    assert_eq!(report["result_code"], "error_not_found");
    assert_eq!(report["state"], "finished");
}

#[test]
fn test_run_echo_body_copies_parameter() {
    let output = sc_cli(&["run", "--body", "echo", "--param", "hello", "--json"]);
    let report = stdout_json(&output);

    assert_eq!(report["result_code"], "ok");
    assert_eq!(report["echo"], "hello");
}

#[test]
fn test_run_echo_without_parameter_is_invalid_params() {
    let output = sc_cli(&["run", "--body", "echo", "--json"]);
    let report = stdout_json(&output);

    assert_eq!(report["result_code"], "error_invalid_params");
    assert!(report.get("echo").is_none());
}

#[test]
fn test_run_rejects_too_many_params_from_config() {
    // Scenario: registry limited to 2 ordinal relations
    // When: two parameters are passed
    // Then: the CLI exits with the invalid-parameters code

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("sc-agent.toml");
    fs::write(
        &config_path,
        "ordinal_relation_count = 2\nlog_profile = \"test\"\n",
    )
    .unwrap();

    let output = sc_cli(&[
        "run",
        "--param",
        "a",
        "--param",
        "b",
        "--config",
        config_path.to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_INVALID_PARAMETERS"), "stderr: {}", stderr);
}

#[test]
fn test_run_rejects_unknown_result_code() {
    let output = sc_cli(&["run", "--result", "maybe"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown result code"));
}

#[test]
fn test_run_text_output() {
    let output = sc_cli(&["run", "--class", "Search", "--param", "foo"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("state: finished"));
    assert!(stdout.contains("result_code: ok"));
}

#[test]
fn test_keynodes_lists_registry() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("sc-agent.toml");
    fs::write(&config_path, "ordinal_relation_count = 3\n").unwrap();

    let output = sc_cli(&[
        "keynodes",
        "--config",
        config_path.to_str().unwrap(),
        "--json",
    ]);
    let entries = stdout_json(&output);
    let idtfs: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["idtf"].as_str().unwrap())
        .collect();

    assert!(idtfs.contains(&"command_initiated"));
    assert!(idtfs.contains(&"nrel_result"));
    assert!(idtfs.contains(&"rrel_3"));
    assert!(!idtfs.contains(&"rrel_4"));
    assert!(idtfs.contains(&"sc_result_ok"));
    assert!(idtfs.contains(&"command_claimed"));
    assert_eq!(idtfs.len(), 6 + 3 + 11);
    assert_eq!(entries[0]["kind"], "node_class");
}
