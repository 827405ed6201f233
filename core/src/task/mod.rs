//! The MSBuild task: configuration value, command rendering and the `run`
//! entry point that folds a process outcome into the integration result.
pub mod command;
mod result;
mod state;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::MsBuildTaskConfig;
use crate::context::{IntegrationContext, IntegrationResult, IntegrationStatus};
use crate::error::ExecError;
use crate::runner::{ProcessExecutor, ProcessInfo, ProcessPriority};

pub use result::TaskResult;
pub use state::{TaskState, TransitionError};

pub const TASK_NAME: &str = "msbuild";
pub const DEFAULT_EXECUTABLE: &str = "msbuild";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_LOGGER: &str =
    "ThoughtWorks.CruiseControl.MsBuild.XmlLogger,ThoughtWorks.CruiseControl.MsBuild.dll";
/// Logger output file, relative to the artifact directory.
pub const DEFAULT_OUTPUT_FILE: &str = "msbuild-results.xml";

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("task could not be executed: {0}")]
    Launch(#[from] ExecError),
}

/// Immutable MSBuild task configuration. Build one with
/// [`MsBuildTaskBuilder`] or bind it from a config section with
/// [`MsBuildTask::from_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsBuildTask {
    executable: String,
    project_file: String,
    targets: String,
    build_args: String,
    working_directory: String,
    logger: String,
    timeout_seconds: u64,
    priority: Option<ProcessPriority>,
    environment: BTreeMap<String, String>,
}

impl Default for MsBuildTask {
    fn default() -> Self {
        MsBuildTaskBuilder::new().build()
    }
}

impl MsBuildTask {
    pub fn builder() -> MsBuildTaskBuilder {
        MsBuildTaskBuilder::new()
    }

    /// Bind a raw `[msbuild]` section. Absent fields take their defaults;
    /// present fields are carried over untouched.
    pub fn from_config(cfg: &MsBuildTaskConfig) -> Self {
        let mut b = MsBuildTaskBuilder::new();
        if let Some(v) = &cfg.executable {
            b = b.executable(v.as_str());
        }
        if let Some(v) = &cfg.working_directory {
            b = b.working_directory(v.as_str());
        }
        if let Some(v) = &cfg.project_file {
            b = b.project_file(v.as_str());
        }
        if let Some(v) = &cfg.build_args {
            b = b.build_args(v.as_str());
        }
        if let Some(v) = &cfg.targets {
            b = b.targets(v.as_str());
        }
        if let Some(v) = cfg.timeout {
            b = b.timeout_seconds(v);
        }
        if let Some(v) = &cfg.logger {
            b = b.logger(v.as_str());
        }
        if let Some(v) = cfg.priority {
            b = b.priority(v);
        }
        for (k, v) in &cfg.environment {
            b = b.env(k.as_str(), v.as_str());
        }
        b.build()
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn project_file(&self) -> &str {
        &self.project_file
    }

    pub fn targets(&self) -> &str {
        &self.targets
    }

    pub fn build_args(&self) -> &str {
        &self.build_args
    }

    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn priority(&self) -> Option<ProcessPriority> {
        self.priority
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    /// Invocation this task would launch for the given context.
    pub fn process_info(&self, ctx: &IntegrationContext) -> ProcessInfo {
        command::build_process_info(self, ctx)
    }

    /// Run the build tool once and record the outcome on `result`.
    ///
    /// Success and Failure (including timeouts) are returned as `Ok`. A
    /// process that cannot be launched is recorded as Exception and also
    /// returned as `Err`, since it points at misconfiguration.
    pub async fn run(
        &self,
        executor: &dyn ProcessExecutor,
        result: &mut IntegrationResult,
    ) -> Result<IntegrationStatus, TaskError> {
        let info = self.process_info(&result.current_context());
        let started_at = chrono::Utc::now().to_rfc3339();

        tracing::info!(
            task = TASK_NAME,
            executor = executor.name(),
            executable = %info.executable,
            working_dir = %info.working_directory,
            timeout_secs = self.timeout_seconds,
            "starting build task"
        );
        tracing::debug!(command_line = %info.command_line(), "rendered command line");

        match executor.execute(&info).await {
            Ok(outcome) => {
                let status = TaskState::from_outcome(&outcome).outcome_status();
                if outcome.timed_out {
                    tracing::warn!(
                        task = TASK_NAME,
                        timeout_secs = self.timeout_seconds,
                        "build task timed out"
                    );
                } else if outcome.exit_code != 0 {
                    tracing::warn!(
                        task = TASK_NAME,
                        exit_code = outcome.exit_code,
                        "build task failed"
                    );
                }
                tracing::info!(
                    task = TASK_NAME,
                    status = %status,
                    duration_ms = outcome.duration.as_millis() as u64,
                    "build task finished"
                );
                result.record(TaskResult::from_outcome(
                    TASK_NAME, status, &outcome, started_at,
                ));
                Ok(status)
            }
            Err(err) => {
                tracing::error!(task = TASK_NAME, error = %err, "build task could not be launched");
                result.record(TaskResult::launch_failure(
                    TASK_NAME,
                    err.to_string(),
                    started_at,
                ));
                Err(TaskError::Launch(err))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MsBuildTaskBuilder {
    executable: Option<String>,
    project_file: Option<String>,
    targets: Option<String>,
    build_args: Option<String>,
    working_directory: Option<String>,
    logger: Option<String>,
    timeout_seconds: Option<i64>,
    priority: Option<ProcessPriority>,
    environment: BTreeMap<String, String>,
}

impl MsBuildTaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executable(mut self, v: impl Into<String>) -> Self {
        self.executable = Some(v.into());
        self
    }

    pub fn project_file(mut self, v: impl Into<String>) -> Self {
        self.project_file = Some(v.into());
        self
    }

    pub fn targets(mut self, v: impl Into<String>) -> Self {
        self.targets = Some(v.into());
        self
    }

    pub fn build_args(mut self, v: impl Into<String>) -> Self {
        self.build_args = Some(v.into());
        self
    }

    pub fn working_directory(mut self, v: impl Into<String>) -> Self {
        self.working_directory = Some(v.into());
        self
    }

    pub fn logger(mut self, v: impl Into<String>) -> Self {
        self.logger = Some(v.into());
        self
    }

    /// Zero or negative values are replaced by [`DEFAULT_TIMEOUT_SECS`].
    pub fn timeout_seconds(mut self, v: i64) -> Self {
        self.timeout_seconds = Some(v);
        self
    }

    pub fn priority(mut self, v: ProcessPriority) -> Self {
        self.priority = Some(v);
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> MsBuildTask {
        MsBuildTask {
            executable: non_blank_or(self.executable, DEFAULT_EXECUTABLE),
            project_file: self.project_file.unwrap_or_default(),
            targets: self.targets.unwrap_or_default(),
            build_args: self.build_args.unwrap_or_default(),
            working_directory: self.working_directory.unwrap_or_default(),
            logger: non_blank_or(self.logger, DEFAULT_LOGGER),
            timeout_seconds: match self.timeout_seconds {
                Some(secs) if secs > 0 => secs as u64,
                _ => DEFAULT_TIMEOUT_SECS,
            },
            priority: self.priority,
            environment: self.environment,
        }
    }
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}
