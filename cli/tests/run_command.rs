#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use ccbuild_cli::commands::cli::{BuildConditionArg, ContextArgs, RunArgs, StatusArg};
use ccbuild_cli::commands::run;
use ccbuild_core::api::{AppConfig, ExecutorConfig};
use ccbuild_plugins::TokioProcessExecutor;

fn fake_msbuild(dir: &Path, body: &str) -> String {
    let path = dir.join("fake-msbuild");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}

fn config(executable: &str, extra: &str) -> AppConfig {
    AppConfig::from_toml_str(&format!(
        "[msbuild]\nexecutable = '{}'\n{}\n",
        executable, extra
    ))
    .unwrap()
}

fn run_args(work: &Path, json: bool) -> RunArgs {
    RunArgs {
        context: ContextArgs {
            project: "test".into(),
            label: "1.0".into(),
            working_dir: Some(work.to_string_lossy().into_owned()),
            artifact_dir: "artifacts".into(),
            build_condition: BuildConditionArg::ForceBuild,
            last_status: StatusArg::Success,
        },
        json,
    }
}

fn executor() -> TokioProcessExecutor {
    TokioProcessExecutor::new(ExecutorConfig {
        capture_bytes: 64 * 1024,
        io_drain_timeout_ms: 500,
    })
}

#[tokio::test]
async fn successful_build_prints_output_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_msbuild(dir.path(), r#"for a in "$@"; do echo "[$a]"; done"#);
    let cfg = config(&exe, "projectFile = \"my project.proj\"\ntargets = \"Build;Test\"");

    let mut out = Vec::new();
    let code = run::run(&cfg, &run_args(dir.path(), false), &executor(), &mut out)
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(code, 0);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "[/nologo]");
    assert_eq!(lines[1], "[/t:Build;Test]");
    assert!(lines[2].starts_with("[/p:ccnet.artifact.directory="));
    assert!(lines[2].contains("ccnet.buildcondition=ForceBuild;"));
    assert!(lines[2].contains("ccnet.label=1.0;"));
    assert_eq!(lines[3], "[my project.proj]");
    assert!(lines[4].ends_with("/artifacts/msbuild-results.xml]"));
}

#[tokio::test]
async fn failing_build_exits_one_and_reports_json() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_msbuild(dir.path(), "echo 'error MSB1009'; exit 1");
    let cfg = config(&exe, "");

    let mut out = Vec::new();
    let code = run::run(&cfg, &run_args(dir.path(), true), &executor(), &mut out)
        .await
        .unwrap();

    assert_eq!(code, 1);
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["status"], "Failure");
    assert_eq!(value["task_results"][0]["exit_code"], 1);
    assert_eq!(value["task_results"][0]["timed_out"], false);
    assert_eq!(value["task_output"], "error MSB1009\n");
}

#[tokio::test]
async fn timed_out_build_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_msbuild(dir.path(), "sleep 30");
    let cfg = config(&exe, "timeout = 1");

    let mut out = Vec::new();
    let code = run::run(&cfg, &run_args(dir.path(), true), &executor(), &mut out)
        .await
        .unwrap();

    assert_eq!(code, 1);
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["task_results"][0]["timed_out"], true);
}

#[tokio::test]
async fn missing_executable_is_reported_as_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config("/nonexistent/msbuild", "");

    let mut out = Vec::new();
    let err = run::run(&cfg, &run_args(dir.path(), true), &executor(), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 20);
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["status"], "Exception");
    assert!(value["task_results"][0]["exit_code"].is_null());
}
