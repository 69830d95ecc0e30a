use std::fs;

use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

macro_rules! snake {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!("snake")
    };
}

fn write_plan(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("plan.toml");
    fs::write(&path, content).expect("failed to write plan");
    path
}

#[test]
fn demo_commits_every_action() {
    snake!()
        .arg("demo")
        .assert()
        .success()
        .stdout(contains(
            "✓ toggle props=\"asd\" state=SwitchState { value: true } ran=true reverted=false",
        ))
        .stdout(contains(
            "✓ toggle props=\"qwe\" state=SwitchState { value: true } ran=true reverted=false",
        ))
        .stdout(contains(
            "✓ counter props=1 state=SwitchState { value: true } ran=true reverted=false",
        ))
        .stdout(contains("Saga committed\n"));
}

#[test]
fn demo_force_rollback_reverts_every_action() {
    snake!()
        .args(["demo", "--force-rollback"])
        .assert()
        .success()
        .stdout(contains(
            "↩ toggle props=\"asd\" state=SwitchState { value: false } ran=true reverted=true",
        ))
        .stdout(contains(
            "↩ counter props=1 state=SwitchState { value: false } ran=true reverted=true",
        ))
        .stdout(contains("Audit log:\n  ↩ toggle\n  ↩ toggle\n  ↩ counter\n"))
        .stdout(contains("Saga committed and rolled back"));
}

#[test]
fn demo_fail_rolls_back_and_exits_with_error() {
    snake!()
        .args(["demo", "--fail"])
        .assert()
        .failure()
        .stdout(contains(
            "↩ toggle props=\"asd\" state=SwitchState { value: false } ran=true reverted=true",
        ))
        .stdout(contains(
            "· fail props=2 state=SwitchState { value: false } ran=false reverted=false",
        ))
        .stdout(contains("Saga failed"))
        .stderr(contains("error: saga did not commit"))
        .stderr(contains("caused by: action 'fail' at position 3 failed"))
        .stderr(contains("caused by: demo"));
}

#[test]
fn run_commits_plan_actions() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let plan = write_plan(
        &dir,
        r#"
[[action]]
kind = "toggle"
label = "asd"

[[action]]
kind = "sleep"
millis = 1
label = "nap"
"#,
    );

    snake!()
        .arg("run")
        .arg(&plan)
        .assert()
        .success()
        .stdout(contains("✓ toggle props=\"asd\""))
        .stdout(contains("✓ sleep props=1ms"))
        .stdout(contains("Saga committed\n"));
}

#[test]
fn run_honours_force_rollback_from_plan() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let plan = write_plan(
        &dir,
        r#"
forceRollback = true

[[action]]
kind = "counter"
value = 7
"#,
    );

    snake!()
        .arg("run")
        .arg(&plan)
        .assert()
        .success()
        .stdout(contains("↩ counter props=7"))
        .stdout(contains("Saga committed and rolled back"));
}

#[test]
fn run_flag_overrides_plan() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let plan = write_plan(
        &dir,
        r#"
force_rollback = false

[[action]]
kind = "toggle"
label = "x"
"#,
    );

    snake!()
        .arg("run")
        .arg(&plan)
        .arg("--force-rollback")
        .assert()
        .success()
        .stdout(contains("↩ toggle props=\"x\""));
}

#[test]
fn run_reports_failing_plan_action() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let plan = write_plan(
        &dir,
        r#"
[[action]]
kind = "counter"
value = 1

[[action]]
kind = "fail"
message = "disk full"
"#,
    );

    snake!()
        .arg("run")
        .arg(&plan)
        .assert()
        .failure()
        .stdout(contains("↩ counter props=1"))
        .stderr(contains("caused by: disk full"));
}

#[test]
fn run_missing_plan_fails() {
    let dir = TempDir::new().expect("failed to create temp dir");

    snake!()
        .arg("run")
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(contains("error: failed to read plan"))
        .stdout(contains("Actions:").not());
}

#[test]
fn run_invalid_plan_fails() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let plan = write_plan(
        &dir,
        r#"
[[action]]
kind = "explode"
"#,
    );

    snake!()
        .arg("run")
        .arg(&plan)
        .assert()
        .failure()
        .stderr(contains("error: failed to parse plan"));
}
