mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::tempdir;

fn run_predict(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_predict"))
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .expect("failed to spawn predict")
}

fn run_train(dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_train"))
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .expect("failed to spawn train")
}

#[test]
fn test_train_prints_metrics_before_saving() {
    let dir = tempdir().unwrap();
    let paths = common::write_dataset(dir.path(), 60);
    // A directory in the model's place makes the save step fail.
    fs::create_dir_all(&paths.model).unwrap();

    let out = run_train(dir.path());
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("RMSE: "), "stdout: {stdout}");
    assert!(stdout.contains("MAE: "));
    assert!(stdout.contains("R2: "));
    assert!(!paths.report.exists());
}

#[test]
fn test_blank_location_flag_exits_non_zero() {
    let dir = tempdir().unwrap();
    common::train_under(dir.path(), 10);

    let out = run_predict(dir.path(), &["--defaults", "--location", ""]);
    assert!(!out.status.success());
    assert!(!String::from_utf8_lossy(&out.stdout).contains("Predicted Price"));
}

#[test]
fn test_no_flags_without_terminal_exits_non_zero() {
    let dir = tempdir().unwrap();
    common::train_under(dir.path(), 10);

    let out = run_predict(dir.path(), &[]);
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!stdout.contains("Predicted Price"));
    assert!(
        stderr.contains("Missing required argument --area; provide via flag or use --defaults"),
        "stderr: {stderr}"
    );
}

#[test]
fn test_missing_model_is_fatal() {
    let dir = tempdir().unwrap();
    let out = run_predict(dir.path(), &["--defaults"]);
    assert!(!out.status.success());
    assert!(!String::from_utf8_lossy(&out.stdout).contains("Predicted Price"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to load model from"));
}

#[test]
fn test_defaults_print_integer_prediction() {
    let dir = tempdir().unwrap();
    common::train_under(dir.path(), 10);

    let out = run_predict(dir.path(), &["--area", "2000", "--defaults"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    let value = stdout
        .trim()
        .strip_prefix("Predicted Price: ")
        .expect("prediction line");
    assert!(value.parse::<i64>().is_ok(), "not an integer: {value}");
}

#[test]
fn test_all_flags_without_defaults() {
    let dir = tempdir().unwrap();
    common::train_under(dir.path(), 10);

    let out = run_predict(
        dir.path(),
        &[
            "--area", "1200", "--bedrooms", "2", "--bathrooms", "1", "--year_built", "1990",
            "--age", "35", "--location", "Atlantis",
        ],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Predicted Price: "));
}
