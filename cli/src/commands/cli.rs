use std::path::PathBuf;

use ccbuild_core::api::{BuildCondition, IntegrationContext, IntegrationStatus};
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ccbuild", version, about = "Render and run MSBuild integration tasks")]
pub struct Args {
    /// Configuration document. Defaults to ./ccbuild.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the invocation without starting a process.
    Render(ContextArgs),
    /// Run the build tool and report the integration result.
    Run(RunArgs),
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildConditionArg {
    NoBuild,
    IfModificationExists,
    ForceBuild,
}

impl From<BuildConditionArg> for BuildCondition {
    fn from(v: BuildConditionArg) -> Self {
        match v {
            BuildConditionArg::NoBuild => BuildCondition::NoBuild,
            BuildConditionArg::IfModificationExists => BuildCondition::IfModificationExists,
            BuildConditionArg::ForceBuild => BuildCondition::ForceBuild,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    Success,
    Failure,
    Exception,
    Unknown,
}

impl From<StatusArg> for IntegrationStatus {
    fn from(v: StatusArg) -> Self {
        match v {
            StatusArg::Success => IntegrationStatus::Success,
            StatusArg::Failure => IntegrationStatus::Failure,
            StatusArg::Exception => IntegrationStatus::Exception,
            StatusArg::Unknown => IntegrationStatus::Unknown,
        }
    }
}

/// Integration metadata normally supplied by the orchestration engine.
#[derive(ClapArgs, Debug, Clone)]
pub struct ContextArgs {
    #[arg(long, default_value = "")]
    pub project: String,

    #[arg(long, default_value = "")]
    pub label: String,

    /// Integration working directory. Defaults to the current directory.
    #[arg(long)]
    pub working_dir: Option<String>,

    /// Artifact directory; relative values are resolved against the working directory.
    #[arg(long, default_value = "")]
    pub artifact_dir: String,

    #[arg(long, value_enum, default_value_t = BuildConditionArg::NoBuild)]
    pub build_condition: BuildConditionArg,

    #[arg(long, value_enum, default_value_t = StatusArg::Unknown)]
    pub last_status: StatusArg,
}

impl ContextArgs {
    pub fn to_context(&self) -> std::io::Result<IntegrationContext> {
        let working_directory = match self.working_dir.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => dir.to_string(),
            _ => std::env::current_dir()?.to_string_lossy().into_owned(),
        };
        Ok(IntegrationContext {
            project_name: self.project.clone(),
            label: self.label.clone(),
            working_directory,
            artifact_directory: self.artifact_dir.clone(),
            build_condition: self.build_condition.into(),
            integration_status: IntegrationStatus::Success,
            last_integration_status: self.last_status.into(),
        })
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Print the whole integration result as JSON instead of the task output.
    #[arg(long)]
    pub json: bool,
}
