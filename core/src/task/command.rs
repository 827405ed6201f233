//! Renders an `MsBuildTask` plus integration context into the argument
//! vector for the build tool.
//!
//! Token order and quoting are a compatibility surface. Snapshot comparisons
//! against literal command lines depend on them byte for byte.
use std::time::Duration;

use crate::context::IntegrationContext;
use crate::runner::ProcessInfo;
use crate::util::paths;

use super::{MsBuildTask, DEFAULT_OUTPUT_FILE};

/// Integration property keys, in the order they are rendered.
pub const INTEGRATION_PROPERTY_KEYS: [&str; 7] = [
    "ccnet.artifact.directory",
    "ccnet.buildcondition",
    "ccnet.integration.status",
    "ccnet.label",
    "ccnet.lastintegration.status",
    "ccnet.project",
    "ccnet.working.directory",
];

pub fn build_process_info(task: &MsBuildTask, ctx: &IntegrationContext) -> ProcessInfo {
    ProcessInfo {
        executable: task.executable().to_string(),
        args: build_args(task, ctx),
        working_directory: working_directory(task, ctx),
        timeout: Duration::from_secs(task.timeout_seconds()),
        envs: task.environment().clone(),
        priority: task.priority(),
    }
}

pub fn build_args(task: &MsBuildTask, ctx: &IntegrationContext) -> Vec<String> {
    let mut args = vec!["/nologo".to_string()];

    if !task.targets().is_empty() {
        args.push(quote_if_spaced(format!("/t:{}", task.targets())));
    }

    args.push(property_token(ctx));

    if !task.build_args().is_empty() {
        args.push(task.build_args().to_string());
    }

    if !task.project_file().is_empty() {
        args.push(quote_if_spaced(task.project_file().to_string()));
    }

    args.push(logger_token(task, ctx));
    args
}

/// Process working directory: the task's directory rebased onto the context
/// directory, or the context directory itself.
pub fn working_directory(task: &MsBuildTask, ctx: &IntegrationContext) -> String {
    paths::resolve(&ctx.working_directory, task.working_directory())
}

/// `(key, value)` pairs exposed to the build tool, in rendering order.
pub fn integration_properties(ctx: &IntegrationContext) -> [(&'static str, String); 7] {
    let [artifact, condition, status, label, last, project, workdir] = INTEGRATION_PROPERTY_KEYS;
    [
        (artifact, artifact_directory(ctx)),
        (condition, ctx.build_condition.to_string()),
        (status, ctx.integration_status.to_string()),
        (label, ctx.label.clone()),
        (last, ctx.last_integration_status.to_string()),
        (project, ctx.project_name.clone()),
        (workdir, ctx.working_directory.clone()),
    ]
}

fn artifact_directory(ctx: &IntegrationContext) -> String {
    paths::resolve(&ctx.working_directory, &ctx.artifact_directory)
}

fn property_token(ctx: &IntegrationContext) -> String {
    let joined = integration_properties(ctx)
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(";");
    quote_if_spaced(format!("/p:{}", joined))
}

fn logger_token(task: &MsBuildTask, ctx: &IntegrationContext) -> String {
    let output = paths::join(&artifact_directory(ctx), DEFAULT_OUTPUT_FILE);
    quote_if_spaced(format!("/l:{};{}", task.logger(), output))
}

fn quote_if_spaced(token: String) -> String {
    if token.chars().any(char::is_whitespace) {
        format!("\"{}\"", token)
    } else {
        token
    }
}
