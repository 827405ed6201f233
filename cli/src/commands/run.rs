use std::io::Write;

use ccbuild_core::api::{
    AppConfig, IntegrationResult, IntegrationStatus, MsBuildTask, ProcessExecutor,
};

use super::cli::RunArgs;
use crate::error::CliError;

/// Run the configured task once. Build success maps to exit code 0, build
/// failure (including timeouts) to 1; a launch failure is returned as an
/// error after the result has been printed.
pub async fn run(
    cfg: &AppConfig,
    args: &RunArgs,
    executor: &dyn ProcessExecutor,
    out: &mut dyn Write,
) -> Result<i32, CliError> {
    let task = MsBuildTask::from_config(cfg.msbuild()?);
    let mut result = IntegrationResult::new(args.context.to_context()?);

    let outcome = task.run(executor, &mut result).await;
    print_result(&result, args.json, out)?;

    match outcome? {
        IntegrationStatus::Success => Ok(0),
        _ => Ok(1),
    }
}

fn print_result(result: &IntegrationResult, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    if json {
        let s = serde_json::to_string_pretty(result).map_err(anyhow::Error::from)?;
        writeln!(out, "{}", s)?;
    } else {
        out.write_all(result.task_output.as_bytes())?;
        if !result.task_output.is_empty() && !result.task_output.ends_with('\n') {
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
