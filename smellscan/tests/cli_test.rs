//! Integration tests for the `smellscan` command line.
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn smellscan() -> Result<Command> {
    Ok(Command::cargo_bin("smellscan-bin")?)
}

#[test]
fn test_cli_json_report() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("leaky.cpp"),
        "void f() {\n  A* a = new A();\n  B* b = new B();\n}\n",
    )?;

    let output = smellscan()?
        .arg(temp.path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output)?;
    assert_eq!(json["summary"]["total_files"], 1);
    assert_eq!(json["reports"][0]["language"], "cpp");
    let leaks = json["reports"][0]["smells"]["by_type"]["potential_memory_leak"].as_u64();
    assert_eq!(leaks, Some(2));
    assert!(json["failures"].as_array().is_some_and(Vec::is_empty));
    Ok(())
}

#[test]
fn test_cli_console_report() -> Result<()> {
    let temp = TempDir::new()?;
    let file = temp.path().join("wide.py");
    fs::write(&file, "def wide(a, b, c, d, e, f):\n    return a\n")?;

    smellscan()?
        .arg(&file)
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("long_parameter_list"))
        .stdout(predicate::str::contains("Function 'wide' has 6 parameters"));
    Ok(())
}

#[test]
fn test_cli_missing_path() -> Result<()> {
    smellscan()?
        .arg("/no/such/place")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn test_cli_fail_under() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("a.py"), "x = 1\n")?;

    smellscan()?
        .arg(temp.path())
        .args(["--quiet", "--fail-under", "100.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("[GATE]"));

    smellscan()?
        .arg(temp.path())
        .args(["--quiet", "--fail-under", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
    Ok(())
}

#[test]
fn test_cli_fail_under_from_config() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("a.py"), "x = 1\n")?;
    fs::write(
        temp.path().join(".smellscan.toml"),
        "[smellscan]\nfail_under = 100.5\n",
    )?;

    smellscan()?.arg(temp.path()).arg("--quiet").assert().code(2);
    Ok(())
}

#[test]
fn test_cli_languages() -> Result<()> {
    smellscan()?
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains(".py"))
        .stdout(predicate::str::contains(".cs"));
    Ok(())
}

#[test]
fn test_cli_train_and_use_model() -> Result<()> {
    let temp = TempDir::new()?;
    let dataset = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("complexity.csv");
    let model = temp.path().join("model.json");

    smellscan()?
        .args(["train", "--dataset"])
        .arg(&dataset)
        .arg("--output")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("Model written to"));
    assert!(model.exists());

    let source = temp.path().join("flat.py");
    fs::write(&source, "x = 1\n")?;
    let output = smellscan()?
        .arg(&source)
        .arg("--json")
        .arg("--model")
        .arg(&model)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output)?;
    let prediction = &json["reports"][0]["complexity"]["prediction"];
    assert_eq!(prediction["status"], "predicted");
    assert_eq!(prediction["label"], "O(1)");
    Ok(())
}

#[test]
fn test_cli_help() -> Result<()> {
    smellscan()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(".smellscan.toml"));
    Ok(())
}
