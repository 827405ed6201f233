use std::io::Write;

use ccbuild_core::api::{AppConfig, MsBuildTask};

use super::cli::ContextArgs;
use crate::error::CliError;

pub fn render(cfg: &AppConfig, args: &ContextArgs, out: &mut dyn Write) -> Result<i32, CliError> {
    let task = MsBuildTask::from_config(cfg.msbuild()?);
    let info = task.process_info(&args.to_context()?);

    writeln!(out, "executable:        {}", info.executable)?;
    writeln!(out, "working directory: {}", info.working_directory)?;
    writeln!(out, "timeout:           {}s", info.timeout.as_secs())?;
    writeln!(out, "arguments:         {}", info.command_line())?;
    Ok(0)
}
