use std::fs;
use std::process::Command;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

fn table2json() -> Command {
    Command::new(env!("CARGO_BIN_EXE_table2json"))
}

#[test]
fn converts_json_table_with_preset() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("people.json");
    let output = dir.path().join("people.out.json");
    fs::write(
        &input,
        r#"[["", "Tom", "Dick"], ["Age", 24, 32], ["Country", "NZ", "AU"]]"#,
    )
    .expect("fixture should be written");

    let status = table2json()
        .args(["convert", "--preset", "row.column", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .expect("CLI should run");
    assert_eq!(status.code(), Some(0));

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("output should exist"))
            .expect("output should be JSON");
    assert_eq!(
        written,
        json!({
            "Tom": { "Age": 24, "Country": "NZ" },
            "Dick": { "Age": 32, "Country": "AU" },
        })
    );
}

#[test]
fn converts_csv_with_explicit_headers_to_stdout() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("grid.csv");
    fs::write(&input, ",,0,1\n,Test 1,1,2\n,Test 2,4,5\n").expect("fixture should be written");

    let output = table2json()
        .args(["convert", "--header", "row:2:0", "--header", "column:1:1", "--compact", "-i"])
        .arg(&input)
        .output()
        .expect("CLI should run");
    assert_eq!(output.status.code(), Some(0));

    let written: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(
        written,
        json!({
            "0": { "Test 1": "1", "Test 2": "4" },
            "1": { "Test 1": "2", "Test 2": "5" },
        })
    );
}

#[test]
fn reads_config_file() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("table.json");
    let config = dir.path().join("config.json");
    fs::write(&input, r#"[["a", "b"], [1, 2]]"#).expect("fixture should be written");
    fs::write(&config, r#"{ "preset": "column" }"#).expect("config should be written");

    let output = table2json()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("CLI should run");
    assert_eq!(output.status.code(), Some(0));

    let written: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(written, json!([{ "a": "b", "1": 2 }]));
}

#[test]
fn exits_with_code_1_on_invalid_preset() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("table.json");
    fs::write(&input, r#"[["a"], [1]]"#).expect("fixture should be written");

    let output = table2json()
        .args(["convert", "--preset", "diagonal", "-i"])
        .arg(&input)
        .output()
        .expect("CLI should run");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid --preset"));
}

#[test]
fn exits_with_code_2_when_no_entries() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("headers-only.json");
    fs::write(&input, r#"[["a", "b"]]"#).expect("fixture should be written");

    let status = table2json()
        .args(["convert", "-i"])
        .arg(&input)
        .status()
        .expect("CLI should run");
    assert_eq!(status.code(), Some(2));
}
